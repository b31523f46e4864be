use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, api_tokens, users};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Register a new user id.
    pub async fn create_user(&self, user_id: &str) -> ResultEngine<String> {
        let user_id = normalize_required_text(user_id, "user id")?;
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(user_id.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::Conflict(format!(
                    "user {user_id} already exists"
                )));
            }
            users::ActiveModel {
                user_id: ActiveValue::Set(user_id.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(user_id, "user created");
            Ok(user_id)
        })
    }

    /// Issue a fresh bearer token for `user_id`.
    ///
    /// The plain token is returned once; only its digest is stored.
    pub async fn issue_token(&self, user_id: &str) -> ResultEngine<String> {
        let user_id = normalize_required_text(user_id, "user id")?;
        with_tx!(self, |db_tx| {
            users::Entity::find_by_id(user_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let token = Uuid::new_v4().to_string();
            api_tokens::ActiveModel {
                token_hash: ActiveValue::Set(api_tokens::token_hash(&token)),
                user_id: ActiveValue::Set(user_id.clone()),
                created_at: ActiveValue::Set(Utc::now()),
                revoked_at: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(user_id, "api token issued");
            Ok(token)
        })
    }

    pub async fn revoke_token(&self, token: &str) -> ResultEngine<()> {
        let revoked = api_tokens::Entity::update_many()
            .col_expr(api_tokens::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(api_tokens::Column::TokenHash.eq(api_tokens::token_hash(token)))
            .filter(api_tokens::Column::RevokedAt.is_null())
            .exec(&self.database)
            .await?;
        if revoked.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("token not exists".to_string()));
        }
        Ok(())
    }

    /// Resolve a bearer token to the user id it was issued for.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(EngineError::Unauthorized("missing token".to_string()));
        }
        api_tokens::Entity::find_by_id(api_tokens::token_hash(token))
            .filter(api_tokens::Column::RevokedAt.is_null())
            .one(&self.database)
            .await?
            .map(|model| model.user_id)
            .ok_or_else(|| EngineError::Unauthorized("invalid token".to_string()))
    }
}

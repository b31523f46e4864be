use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Split, split_people, splits};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Split `amount_minor` evenly between `names`.
    ///
    /// Shares are rounded half-up to the paisa; the rounding remainder is not
    /// redistributed (see [`Split::remainder_minor`]).
    pub async fn create_split(
        &self,
        owner_id: &str,
        amount_minor: i64,
        names: &[String],
        category: &str,
    ) -> ResultEngine<Split> {
        let category = normalize_required_text(category, "category")?;
        let names = names
            .iter()
            .map(|name| normalize_required_text(name, "person name"))
            .collect::<ResultEngine<Vec<_>>>()?;
        let split = Split::even(owner_id, amount_minor, names, category)?;

        with_tx!(self, |db_tx| {
            splits::ActiveModel::try_from(&split)?.insert(&db_tx).await?;
            for (position, person) in split.people.iter().enumerate() {
                split_people::active_model(split.id, position, person)?
                    .insert(&db_tx)
                    .await?;
            }
            if split.remainder_minor() != 0 {
                tracing::debug!(
                    split_id = %split.id,
                    remainder_minor = split.remainder_minor(),
                    "even split left a rounding remainder"
                );
            }
            Ok(split)
        })
    }

    /// Splits of `owner_id`, newest first.
    pub async fn list_splits(&self, owner_id: &str) -> ResultEngine<Vec<Split>> {
        let rows = splits::Entity::find()
            .filter(splits::Column::OwnerId.eq(owner_id))
            .order_by_desc(splits::Column::CreatedAt)
            .find_with_related(split_people::Entity)
            .all(&self.database)
            .await?;

        let mut out = rows
            .into_iter()
            .map(|(split, people)| Split::from_models(split, people))
            .collect::<ResultEngine<Vec<_>>>()?;
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    pub async fn split(&self, owner_id: &str, split_id: Uuid) -> ResultEngine<Split> {
        with_tx!(self, |db_tx| self.require_split(&db_tx, owner_id, split_id).await)
    }

    /// Mark the person at `person_index` as settled.
    ///
    /// Settling an already settled person is a no-op. The aggregate flag is
    /// recomputed from the stored rows in the same transaction.
    pub async fn settle_person(
        &self,
        owner_id: &str,
        split_id: Uuid,
        person_index: usize,
    ) -> ResultEngine<Split> {
        with_tx!(self, |db_tx| {
            let mut split = self.require_split(&db_tx, owner_id, split_id).await?;
            if !split.settle_person(person_index)? {
                return Ok(split);
            }

            let position = i32::try_from(person_index)
                .map_err(|_| EngineError::InvalidInput("person index too large".to_string()))?;
            split_people::Entity::update_many()
                .col_expr(split_people::Column::Settled, Expr::value(true))
                .filter(split_people::Column::SplitId.eq(split_id.to_string()))
                .filter(split_people::Column::Position.eq(position))
                .exec(&db_tx)
                .await?;

            split.settled = self.refresh_split_settled(&db_tx, split_id).await?;
            Ok(split)
        })
    }

    /// Mark everyone in the split as settled.
    pub async fn settle_all(&self, owner_id: &str, split_id: Uuid) -> ResultEngine<Split> {
        with_tx!(self, |db_tx| {
            let mut split = self.require_split(&db_tx, owner_id, split_id).await?;
            split.settle_all();

            split_people::Entity::update_many()
                .col_expr(split_people::Column::Settled, Expr::value(true))
                .filter(split_people::Column::SplitId.eq(split_id.to_string()))
                .exec(&db_tx)
                .await?;
            split.settled = self.refresh_split_settled(&db_tx, split_id).await?;
            Ok(split)
        })
    }

    /// Remove a split. No money moves: a split never holds funds.
    pub async fn delete_split(&self, owner_id: &str, split_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_split(&db_tx, owner_id, split_id).await?;

            split_people::Entity::delete_many()
                .filter(split_people::Column::SplitId.eq(split_id.to_string()))
                .exec(&db_tx)
                .await?;
            splits::Entity::delete_many()
                .filter(splits::Column::Id.eq(split_id.to_string()))
                .filter(splits::Column::OwnerId.eq(owner_id))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_split(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        split_id: Uuid,
    ) -> ResultEngine<Split> {
        let model = splits::Entity::find_by_id(split_id.to_string())
            .filter(splits::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("split not exists".to_string()))?;
        let people = split_people::Entity::find()
            .filter(split_people::Column::SplitId.eq(split_id.to_string()))
            .order_by_asc(split_people::Column::Position)
            .all(db)
            .await?;
        Split::from_models(model, people)
    }

    /// Recompute and persist the aggregate flag from the stored people rows.
    async fn refresh_split_settled(
        &self,
        db: &DatabaseTransaction,
        split_id: Uuid,
    ) -> ResultEngine<bool> {
        let unsettled = split_people::Entity::find()
            .filter(split_people::Column::SplitId.eq(split_id.to_string()))
            .filter(split_people::Column::Settled.eq(false))
            .count(db)
            .await?;
        let settled = unsettled == 0;

        let active = splits::ActiveModel {
            id: ActiveValue::Set(split_id.to_string()),
            settled: ActiveValue::Set(settled),
            ..Default::default()
        };
        active.update(db).await?;
        Ok(settled)
    }
}

//! The module contains `Goal` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// A savings goal.
///
/// The target is soft: `saved_minor` may grow past `target_minor`, reaching
/// it is only reported through [`Goal::reached`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(owner_id: &str, title: String, target_minor: i64) -> ResultEngine<Self> {
        if target_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            title,
            target_minor,
            saved_minor: 0,
            created_at: Utc::now(),
        })
    }

    /// `true` once the saved amount covers the target.
    pub fn reached(&self) -> bool {
        self.saved_minor >= self.target_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(value: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            title: ActiveValue::Set(value.title.clone()),
            target_minor: ActiveValue::Set(value.target_minor),
            saved_minor: ActiveValue::Set(value.saved_minor),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            owner_id: model.owner_id,
            title: model.title,
            target_minor: model.target_minor,
            saved_minor: model.saved_minor,
            created_at: model.created_at,
        })
    }
}

//! Audit log of goal funding events.
//!
//! Rows are append-only and survive the deletion of the goal they refer to,
//! so the title is copied at write time.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Goal, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalActivityKind {
    Add,
    Withdraw,
    GoalDeleted,
}

impl GoalActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Withdraw => "withdraw",
            Self::GoalDeleted => "goal_deleted",
        }
    }
}

impl TryFrom<&str> for GoalActivityKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "add" => Ok(Self::Add),
            "withdraw" => Ok(Self::Withdraw),
            "goal_deleted" => Ok(Self::GoalDeleted),
            other => Err(EngineError::InvalidInput(format!(
                "invalid goal activity kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalActivity {
    pub id: Uuid,
    pub owner_id: String,
    pub goal_id: Uuid,
    pub goal_title: String,
    pub kind: GoalActivityKind,
    pub amount_minor: i64,
    pub payment_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl GoalActivity {
    pub fn record(
        goal: &Goal,
        kind: GoalActivityKind,
        amount_minor: i64,
        payment_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: goal.owner_id.clone(),
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            kind,
            amount_minor,
            payment_id,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goal_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub goal_id: String,
    pub goal_title: String,
    pub kind: String,
    pub amount_minor: i64,
    pub payment_id: Option<String>,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&GoalActivity> for ActiveModel {
    fn from(value: &GoalActivity) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            goal_id: ActiveValue::Set(value.goal_id.to_string()),
            goal_title: ActiveValue::Set(value.goal_title.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            payment_id: ActiveValue::Set(value.payment_id.clone()),
            occurred_at: ActiveValue::Set(value.occurred_at),
        }
    }
}

impl TryFrom<Model> for GoalActivity {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal activity")?,
            owner_id: model.owner_id,
            goal_id: parse_uuid(&model.goal_id, "goal")?,
            goal_title: model.goal_title,
            kind: GoalActivityKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            payment_id: model.payment_id,
            occurred_at: model.occurred_at,
        })
    }
}

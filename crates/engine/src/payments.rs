//! Payment gateway seam and persisted payment orders.
//!
//! The engine never trusts a client-side "payment succeeded" callback. A
//! confirmation only triggers a status lookup through [`PaymentGateway`],
//! and balances are credited only when the gateway reports the order as
//! paid for the amount recorded at creation time.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, util::parse_uuid};

/// Order creation request sent to the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub amount_minor: i64,
    pub currency: Currency,
    pub receipt: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayOrderStatus {
    Created,
    Attempted,
    Paid,
}

/// Order as reported by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub status: GatewayOrderStatus,
}

/// External payment provider.
///
/// Implementations map transport failures to [`EngineError::Upstream`].
#[async_trait]
pub trait PaymentGateway: fmt::Debug + Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> ResultEngine<GatewayOrder>;

    async fn fetch_order(&self, order_id: &str) -> ResultEngine<GatewayOrder>;
}

/// What a payment order pays for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PaymentPurpose {
    Wallet,
    Goal { goal_id: Uuid },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOrderState {
    Created,
    Credited,
}

impl PaymentOrderState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Credited => "credited",
        }
    }
}

impl TryFrom<&str> for PaymentOrderState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "created" => Ok(Self::Created),
            "credited" => Ok(Self::Credited),
            other => Err(EngineError::InvalidInput(format!(
                "invalid payment order state: {other}"
            ))),
        }
    }
}

/// Local record of an order created through the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: String,
    pub owner_id: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub purpose: PaymentPurpose,
    pub state: PaymentOrderState,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub credited_at: Option<DateTime<Utc>>,
}

/// Receipt reference sent with new orders: `rcpt_` plus the last 8 digits
/// of the millisecond timestamp.
pub(crate) fn receipt_for(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(8)..];
    format!("rcpt_{tail}")
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: String,
    pub owner_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub purpose: String,
    pub goal_id: Option<String>,
    pub state: String,
    pub payment_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub credited_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentOrder> for ActiveModel {
    fn from(value: &PaymentOrder) -> Self {
        let (purpose, goal_id) = match value.purpose {
            PaymentPurpose::Wallet => ("wallet", None),
            PaymentPurpose::Goal { goal_id } => ("goal", Some(goal_id.to_string())),
        };
        Self {
            order_id: ActiveValue::Set(value.order_id.clone()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            purpose: ActiveValue::Set(purpose.to_string()),
            goal_id: ActiveValue::Set(goal_id),
            state: ActiveValue::Set(value.state.as_str().to_string()),
            payment_id: ActiveValue::Set(value.payment_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
            credited_at: ActiveValue::Set(value.credited_at),
        }
    }
}

impl TryFrom<Model> for PaymentOrder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let purpose = match (model.purpose.as_str(), model.goal_id.as_deref()) {
            ("wallet", _) => PaymentPurpose::Wallet,
            ("goal", Some(goal_id)) => PaymentPurpose::Goal {
                goal_id: parse_uuid(goal_id, "goal")?,
            },
            (other, _) => {
                return Err(EngineError::InvalidInput(format!(
                    "invalid payment purpose: {other}"
                )));
            }
        };
        Ok(Self {
            order_id: model.order_id,
            owner_id: model.owner_id,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            purpose,
            state: PaymentOrderState::try_from(model.state.as_str())?,
            payment_id: model.payment_id,
            created_at: model.created_at,
            credited_at: model.credited_at,
        })
    }
}

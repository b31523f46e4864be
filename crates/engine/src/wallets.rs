//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

/// A wallet.
///
/// The single cash balance of a user. It is where goal payouts land and
/// where manual deposits/withdrawals are recorded. There is exactly one
/// wallet per owner, keyed by the owner id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub owner_id: String,
    pub balance_minor: i64,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn empty(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            balance_minor: 0,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: String,
    pub balance_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Wallet {
    fn from(value: Model) -> Self {
        Self {
            owner_id: value.owner_id,
            balance_minor: value.balance_minor,
            updated_at: value.updated_at,
        }
    }
}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            balance_minor: ActiveValue::Set(value.balance_minor),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

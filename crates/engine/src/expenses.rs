//! The module contains the `Expense` type and the report summary built on it.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

/// A single spending record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        owner_id: &str,
        amount_minor: i64,
        category: String,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            amount_minor,
            category,
            note,
            created_at: Utc::now(),
        })
    }

    /// `YYYY-MM` bucket used by the monthly report.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.created_at.year(), self.created_at.month())
    }
}

/// Filter applied to expense listings and reports.
///
/// `category` matches as a case-insensitive substring; `from`/`to` are
/// inclusive bounds on `created_at`.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(needle) = self.category.as_deref() {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() && !expense.category.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(from) = self.from
            && expense.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && expense.created_at > to
        {
            return false;
        }
        true
    }
}

/// Totals over a set of expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_minor: i64,
    pub count: usize,
    /// `(YYYY-MM, total)` in chronological order.
    pub monthly: Vec<(String, i64)>,
    /// `(category, total)` sorted by category.
    pub by_category: Vec<(String, i64)>,
}

impl ExpenseSummary {
    /// Fails with [`EngineError::InvalidAmount`] when a total does not fit in
    /// an `i64`.
    pub fn from_expenses<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> ResultEngine<Self> {
        let mut total = MoneyCents::ZERO;
        let mut count = 0;
        let mut monthly: BTreeMap<String, MoneyCents> = BTreeMap::new();
        let mut by_category: BTreeMap<String, MoneyCents> = BTreeMap::new();

        for expense in expenses {
            let amount = MoneyCents::new(expense.amount_minor);
            total = accumulate(total, amount)?;
            count += 1;
            let month = monthly.entry(expense.month_key()).or_default();
            *month = accumulate(*month, amount)?;
            let category = by_category.entry(expense.category.clone()).or_default();
            *category = accumulate(*category, amount)?;
        }

        Ok(Self {
            total_minor: total.cents(),
            count,
            monthly: monthly.into_iter().map(|(k, v)| (k, v.cents())).collect(),
            by_category: by_category
                .into_iter()
                .map(|(k, v)| (k, v.cents()))
                .collect(),
        })
    }
}

fn accumulate(acc: MoneyCents, amount: MoneyCents) -> ResultEngine<MoneyCents> {
    acc.checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount("expense total is too large".to_string()))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            category: ActiveValue::Set(value.category.clone()),
            note: ActiveValue::Set(value.note.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            owner_id: model.owner_id,
            amount_minor: model.amount_minor,
            category: model.category,
            note: model.note,
            created_at: model.created_at,
        })
    }
}

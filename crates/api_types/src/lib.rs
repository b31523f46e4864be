use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub title: String,
        pub target_minor: i64,
    }

    /// Direct overwrite of the saved amount (`PUT /goals/{id}`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub saved_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalWithdraw {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub title: String,
        pub target_minor: i64,
        pub saved_minor: i64,
        /// `saved_minor >= target_minor`. The target is not a ceiling.
        pub reached: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    /// Confirmation returned when a goal is deleted and its savings moved.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalTransferView {
        pub goal_id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub wallet_balance_minor: i64,
        pub message: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalActivityKind {
        Add,
        Withdraw,
        GoalDeleted,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalActivityView {
        pub id: Uuid,
        pub goal_id: Uuid,
        pub goal_title: String,
        pub kind: GoalActivityKind,
        pub amount_minor: i64,
        pub payment_id: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalActivityResponse {
        pub activity: Vec<GoalActivityView>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub balance_minor: i64,
        pub currency: Currency,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletAmount {
        pub amount_minor: i64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WalletTransactionKind {
        Deposit,
        Withdraw,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletTransactionView {
        pub id: Uuid,
        pub kind: WalletTransactionKind,
        /// Always > 0; the kind defines the direction.
        pub amount_minor: i64,
        pub description: Option<String>,
        pub payment_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletTransactionsResponse {
        pub transactions: Vec<WalletTransactionView>,
    }
}

pub mod split {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub amount_minor: i64,
        pub names: Vec<String>,
        pub category: String,
    }

    /// Settlement update. Exactly one of the fields is expected; when both
    /// are present `settle_all` wins.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SplitUpdate {
        pub person_index: Option<usize>,
        pub settle_all: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitPersonView {
        pub name: String,
        pub amount_minor: i64,
        pub settled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub num_people: usize,
        pub category: String,
        pub people: Vec<SplitPersonView>,
        pub settled: bool,
        /// `amount_minor` minus the sum of the shares (rounding drift).
        pub remainder_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitListResponse {
        pub splits: Vec<SplitView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
    }

    /// Query string of expense listings and summaries.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseQuery {
        /// Case-insensitive substring of the category.
        pub category: Option<String>,
        /// RFC3339 timestamps, inclusive.
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthTotal {
        /// `YYYY-MM`.
        pub month: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseSummaryView {
        pub total_minor: i64,
        pub count: usize,
        pub monthly: Vec<MonthTotal>,
        pub by_category: Vec<CategoryTotal>,
    }
}

pub mod payment {
    use super::*;

    /// Without `goal_id` the payment tops up the wallet.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreateOrder {
        pub amount_minor: i64,
        pub goal_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub order_id: String,
        pub amount_minor: i64,
        pub currency: Currency,
        pub goal_id: Option<Uuid>,
    }

    /// Client callback after checkout. Only a trigger: the server asks the
    /// gateway whether `order_id` is really paid.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConfirmPayment {
        pub order_id: String,
        pub payment_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case", tag = "kind")]
    pub enum CreditedTarget {
        Wallet {
            balance_minor: i64,
        },
        Goal {
            goal_id: Uuid,
            title: String,
            saved_minor: i64,
            reached: bool,
        },
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentConfirmed {
        pub order_id: String,
        pub payment_id: String,
        pub amount_minor: i64,
        pub target: CreditedTarget,
        /// `false` when an earlier confirmation already credited the order.
        pub newly_credited: bool,
    }
}

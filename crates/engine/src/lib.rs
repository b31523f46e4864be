//! PocketPal engine.
//!
//! Business rules for wallets, savings goals, bill splits and expenses on top
//! of a `sea-orm` store. Every public operation is scoped by the owner id of
//! the caller and runs as a single database transaction.

pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseFilter, ExpenseSummary};
pub use goal_activity::{GoalActivity, GoalActivityKind};
pub use goals::Goal;
pub use money::MoneyCents;
pub use ops::{CreditTarget, Engine, EngineBuilder, GoalTransfer, PaymentCredit};
pub use payments::{
    GatewayOrder, GatewayOrderStatus, OrderRequest, PaymentGateway, PaymentOrder,
    PaymentOrderState, PaymentPurpose,
};
pub use splits::{Split, SplitPerson};
pub use wallet_transactions::{WalletTransaction, WalletTransactionKind};
pub use wallets::Wallet;

mod api_tokens;
mod currency;
mod error;
mod expenses;
mod goal_activity;
mod goals;
mod money;
mod ops;
mod payments;
mod split_people;
mod splits;
mod users;
mod util;
mod wallet_transactions;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;

//! Wallet API endpoints

use api_types::wallet::{
    WalletAmount, WalletTransactionKind, WalletTransactionView, WalletTransactionsResponse,
    WalletView,
};
use axum::{Extension, Json, extract::State};
use engine::{Currency, Wallet, WalletTransaction};

use crate::{Identity, ServerError, currency_view, server::ServerState};

pub(crate) fn wallet_view(wallet: Wallet, currency: Currency) -> WalletView {
    WalletView {
        balance_minor: wallet.balance_minor,
        currency: currency_view(currency),
        updated_at: wallet.updated_at,
    }
}

fn transaction_view(tx: WalletTransaction) -> WalletTransactionView {
    WalletTransactionView {
        id: tx.id,
        kind: match tx.kind {
            engine::WalletTransactionKind::Deposit => WalletTransactionKind::Deposit,
            engine::WalletTransactionKind::Withdraw => WalletTransactionKind::Withdraw,
            engine::WalletTransactionKind::Transfer => WalletTransactionKind::Transfer,
        },
        amount_minor: tx.amount_minor,
        description: tx.description,
        payment_id: tx.payment_id,
        created_at: tx.created_at,
    }
}

/// Return the wallet, creating it on first access.
pub async fn get(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(&identity.user_id).await?;
    Ok(Json(wallet_view(wallet, state.engine.currency())))
}

pub async fn deposit(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletAmount>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state
        .engine
        .deposit(&identity.user_id, payload.amount_minor)
        .await?;
    Ok(Json(wallet_view(wallet, state.engine.currency())))
}

pub async fn withdraw(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletAmount>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state
        .engine
        .withdraw(&identity.user_id, payload.amount_minor)
        .await?;
    Ok(Json(wallet_view(wallet, state.engine.currency())))
}

pub async fn transactions(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<WalletTransactionsResponse>, ServerError> {
    let transactions = state.engine.wallet_transactions(&identity.user_id).await?;
    Ok(Json(WalletTransactionsResponse {
        transactions: transactions.into_iter().map(transaction_view).collect(),
    }))
}

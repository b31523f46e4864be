//! Payment endpoints
//!
//! `confirm` is only a trigger: the engine checks the order with the
//! gateway before crediting anything.

use api_types::payment::{ConfirmPayment, CreateOrder, CreditedTarget, OrderView, PaymentConfirmed};
use axum::{Extension, Json, extract::State};
use engine::{CreditTarget, PaymentPurpose};

use crate::{Identity, ServerError, currency_view, server::ServerState};

pub async fn create_order(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrder>,
) -> Result<Json<OrderView>, ServerError> {
    let purpose = match payload.goal_id {
        Some(goal_id) => PaymentPurpose::Goal { goal_id },
        None => PaymentPurpose::Wallet,
    };
    let order = state
        .engine
        .create_payment_order(&identity.user_id, payload.amount_minor, purpose)
        .await?;

    Ok(Json(OrderView {
        order_id: order.order_id,
        amount_minor: order.amount_minor,
        currency: currency_view(order.currency),
        goal_id: payload.goal_id,
    }))
}

pub async fn confirm(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmPayment>,
) -> Result<Json<PaymentConfirmed>, ServerError> {
    let credit = state
        .engine
        .confirm_payment(&identity.user_id, &payload.order_id, &payload.payment_id)
        .await?;

    let target = match credit.target {
        CreditTarget::Wallet(wallet) => CreditedTarget::Wallet {
            balance_minor: wallet.balance_minor,
        },
        CreditTarget::Goal(goal) => CreditedTarget::Goal {
            reached: goal.reached(),
            goal_id: goal.id,
            title: goal.title,
            saved_minor: goal.saved_minor,
        },
    };
    Ok(Json(PaymentConfirmed {
        order_id: credit.order.order_id,
        payment_id: payload.payment_id,
        amount_minor: credit.order.amount_minor,
        target,
        newly_credited: credit.newly_credited,
    }))
}

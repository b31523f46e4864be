use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, GatewayOrderStatus, Goal, MoneyCents, OrderRequest, PaymentOrder,
    PaymentOrderState, PaymentPurpose, ResultEngine, Wallet, WalletTransactionKind,
    payments::{self, receipt_for},
    util::ensure_positive,
};

use super::{Engine, with_tx};

/// Balance that received the money of a confirmed payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CreditTarget {
    Wallet(Wallet),
    Goal(Goal),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCredit {
    pub order: PaymentOrder,
    pub target: CreditTarget,
    /// `false` when the order had already been credited by an earlier call.
    pub newly_credited: bool,
}

impl Engine {
    /// Create a gateway order for `amount_minor` and remember what it pays for.
    pub async fn create_payment_order(
        &self,
        owner_id: &str,
        amount_minor: i64,
        purpose: PaymentPurpose,
    ) -> ResultEngine<PaymentOrder> {
        ensure_positive(amount_minor, "payment")?;
        let gateway = self.gateway()?;

        if let PaymentPurpose::Goal { goal_id } = purpose {
            let _: Goal = with_tx!(self, |db_tx| {
                self.require_goal(&db_tx, owner_id, goal_id).await
            })?;
        }

        let now = Utc::now();
        let request = OrderRequest {
            amount_minor,
            currency: self.currency,
            receipt: receipt_for(now),
        };
        let remote = gateway.create_order(&request).await?;

        let order = PaymentOrder {
            order_id: remote.id,
            owner_id: owner_id.to_string(),
            amount_minor,
            currency: self.currency,
            purpose,
            state: PaymentOrderState::Created,
            payment_id: None,
            created_at: now,
            credited_at: None,
        };
        payments::ActiveModel::from(&order)
            .insert(&self.database)
            .await?;

        tracing::info!(
            owner_id,
            order_id = %order.order_id,
            receipt = %request.receipt,
            amount = %MoneyCents::new(amount_minor),
            "payment order created"
        );
        Ok(order)
    }

    pub async fn payment_order(&self, owner_id: &str, order_id: &str) -> ResultEngine<PaymentOrder> {
        with_tx!(self, |db_tx| {
            self.require_payment_order(&db_tx, owner_id, order_id).await
        })
    }

    /// Credit a payment after checking its status with the gateway.
    ///
    /// The caller's claim that the payment succeeded is not trusted: the
    /// order must be reported `paid` for the stored amount. Crediting is
    /// guarded by the order state, so confirming twice credits once.
    pub async fn confirm_payment(
        &self,
        owner_id: &str,
        order_id: &str,
        payment_id: &str,
    ) -> ResultEngine<PaymentCredit> {
        let payment_id = payment_id.trim();
        if payment_id.is_empty() {
            return Err(EngineError::InvalidInput(
                "payment id must not be empty".to_string(),
            ));
        }

        let order = self.payment_order(owner_id, order_id).await?;
        if order.state == PaymentOrderState::Credited {
            return self.replay_credit(order, payment_id).await;
        }

        let remote = self.gateway()?.fetch_order(order_id).await?;
        if remote.status != GatewayOrderStatus::Paid {
            return Err(EngineError::PaymentNotConfirmed(format!(
                "order {order_id} is not paid"
            )));
        }
        if remote.amount_minor != order.amount_minor || remote.currency != order.currency {
            tracing::warn!(
                order_id,
                expected = order.amount_minor,
                reported = remote.amount_minor,
                "gateway reported a different amount for the order"
            );
            return Err(EngineError::PaymentNotConfirmed(format!(
                "order {order_id} amount does not match"
            )));
        }

        let credited: ResultEngine<Option<(PaymentOrder, CreditTarget)>> =
            with_tx!(self, |db_tx| {
                let now = Utc::now();
                let claimed = payments::Entity::update_many()
                    .col_expr(
                        payments::Column::State,
                        Expr::value(PaymentOrderState::Credited.as_str()),
                    )
                    .col_expr(payments::Column::PaymentId, Expr::value(payment_id))
                    .col_expr(payments::Column::CreditedAt, Expr::value(now))
                    .filter(payments::Column::OrderId.eq(order_id))
                    .filter(payments::Column::OwnerId.eq(owner_id))
                    .filter(payments::Column::State.eq(PaymentOrderState::Created.as_str()))
                    .exec(&db_tx)
                    .await?;

                if claimed.rows_affected == 1 {
                    let target = self
                        .credit_order(&db_tx, &order, payment_id)
                        .await?;
                    let order = self
                        .require_payment_order(&db_tx, owner_id, order_id)
                        .await?;
                    Ok(Some((order, target)))
                } else {
                    Ok(None)
                }
            });

        match credited? {
            Some((order, target)) => {
                tracing::info!(
                    owner_id,
                    order_id,
                    payment_id,
                    amount = %MoneyCents::new(order.amount_minor),
                    "payment credited"
                );
                Ok(PaymentCredit {
                    order,
                    target,
                    newly_credited: true,
                })
            }
            // Another confirmation won the race.
            None => {
                let order = self.payment_order(owner_id, order_id).await?;
                self.replay_credit(order, payment_id).await
            }
        }
    }

    async fn credit_order(
        &self,
        db: &DatabaseTransaction,
        order: &PaymentOrder,
        payment_id: &str,
    ) -> ResultEngine<CreditTarget> {
        if let PaymentPurpose::Goal { goal_id } = order.purpose {
            if self.find_goal(db, &order.owner_id, goal_id).await?.is_some() {
                let goal = self
                    .credit_goal(
                        db,
                        &order.owner_id,
                        goal_id,
                        order.amount_minor,
                        Some(payment_id.to_string()),
                    )
                    .await?;
                return Ok(CreditTarget::Goal(goal));
            }
            tracing::warn!(
                order_id = %order.order_id,
                %goal_id,
                "goal of a paid order is gone, crediting the wallet"
            );
        }

        let description = match order.purpose {
            PaymentPurpose::Wallet => "Wallet top-up".to_string(),
            PaymentPurpose::Goal { .. } => "Payment for a deleted goal".to_string(),
        };
        let wallet = self
            .credit_wallet(
                db,
                &order.owner_id,
                order.amount_minor,
                WalletTransactionKind::Deposit,
                Some(description),
                Some(payment_id.to_string()),
            )
            .await?;
        Ok(CreditTarget::Wallet(wallet))
    }

    /// Result of an order credited by an earlier confirmation.
    async fn replay_credit(
        &self,
        order: PaymentOrder,
        payment_id: &str,
    ) -> ResultEngine<PaymentCredit> {
        if order.payment_id.as_deref() != Some(payment_id) {
            return Err(EngineError::Conflict(format!(
                "order {} was already credited by another payment",
                order.order_id
            )));
        }

        let target: ResultEngine<CreditTarget> = with_tx!(self, |db_tx| {
            let goal = match order.purpose {
                PaymentPurpose::Goal { goal_id } => {
                    self.find_goal(&db_tx, &order.owner_id, goal_id).await?
                }
                PaymentPurpose::Wallet => None,
            };
            match goal {
                Some(goal) => Ok(CreditTarget::Goal(goal)),
                None => Ok(CreditTarget::Wallet(
                    self.ensure_wallet(&db_tx, &order.owner_id).await?,
                )),
            }
        });

        tracing::debug!(order_id = %order.order_id, "payment already credited");
        Ok(PaymentCredit {
            order,
            target: target?,
            newly_credited: false,
        })
    }

    async fn require_payment_order(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        order_id: &str,
    ) -> ResultEngine<PaymentOrder> {
        payments::Entity::find_by_id(order_id.to_string())
            .filter(payments::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment order not exists".to_string()))
            .and_then(PaymentOrder::try_from)
    }
}

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, GoalActivity, GoalActivityKind, MoneyCents, ResultEngine,
    WalletTransactionKind, goal_activity, goals,
};

use super::{Engine, with_tx};

/// Outcome of retiring a goal into the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTransfer {
    pub goal_id: Uuid,
    pub title: String,
    pub amount_minor: i64,
    pub wallet_balance_minor: i64,
}

impl Engine {
    /// Delete a goal and move its saved amount into the owner's wallet.
    ///
    /// Runs as one DB transaction:
    ///
    /// 1. read the goal's current saved amount;
    /// 2. create the wallet if missing and credit it (a `transfer` ledger row
    ///    is written when the amount is > 0);
    /// 3. append a `goal_deleted` activity;
    /// 4. delete the goal only if its saved amount is still the one credited.
    ///
    /// If the goal was funded or drained between 1 and 4 the whole transaction
    /// is rolled back with [`EngineError::Conflict`], so money is never
    /// counted twice nor lost.
    pub async fn delete_goal_and_transfer(
        &self,
        owner_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<GoalTransfer> {
        with_tx!(self, |db_tx| {
            let goal = self.require_goal(&db_tx, owner_id, goal_id).await?;
            let amount = MoneyCents::new(goal.saved_minor);

            let wallet = self
                .credit_wallet(
                    &db_tx,
                    owner_id,
                    amount.cents(),
                    WalletTransactionKind::Transfer,
                    Some(format!("Transferred from goal: {}", goal.title)),
                    None,
                )
                .await?;

            let activity =
                GoalActivity::record(&goal, GoalActivityKind::GoalDeleted, amount.cents(), None);
            goal_activity::ActiveModel::from(&activity)
                .insert(&db_tx)
                .await?;

            let deleted = goals::Entity::delete_many()
                .filter(goals::Column::Id.eq(goal_id.to_string()))
                .filter(goals::Column::OwnerId.eq(owner_id))
                .filter(goals::Column::SavedMinor.eq(amount.cents()))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected != 1 {
                return Err(EngineError::Conflict(format!(
                    "goal '{}' changed while being deleted",
                    goal.title
                )));
            }

            tracing::info!(
                owner_id,
                goal = %goal.title,
                amount = %amount,
                "goal deleted and funds moved to wallet"
            );

            Ok(GoalTransfer {
                goal_id,
                title: goal.title,
                amount_minor: amount.cents(),
                wallet_balance_minor: wallet.balance_minor,
            })
        })
    }
}

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Goal, GoalActivity, GoalActivityKind, MoneyCents, ResultEngine, goal_activity,
    goals, util::ensure_positive,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Create a new goal with nothing saved yet.
    pub async fn create_goal(
        &self,
        owner_id: &str,
        title: &str,
        target_minor: i64,
    ) -> ResultEngine<Goal> {
        let title = normalize_required_text(title, "goal title")?;
        let goal = Goal::new(owner_id, title, target_minor)?;
        goals::ActiveModel::from(&goal)
            .insert(&self.database)
            .await?;
        Ok(goal)
    }

    /// Goals of `owner_id`, newest first.
    pub async fn list_goals(&self, owner_id: &str) -> ResultEngine<Vec<Goal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::OwnerId.eq(owner_id))
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Goal::try_from).collect()
    }

    pub async fn goal(&self, owner_id: &str, goal_id: Uuid) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| self.require_goal(&db_tx, owner_id, goal_id).await)
    }

    /// Overwrite the saved amount of a goal.
    ///
    /// This is the direct edit path; it records no activity.
    pub async fn set_goal_saved(
        &self,
        owner_id: &str,
        goal_id: Uuid,
        saved_minor: i64,
    ) -> ResultEngine<Goal> {
        if saved_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "saved amount must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let updated = goals::Entity::update_many()
                .col_expr(goals::Column::SavedMinor, Expr::value(saved_minor))
                .filter(goals::Column::Id.eq(goal_id.to_string()))
                .filter(goals::Column::OwnerId.eq(owner_id))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("goal not exists".to_string()));
            }
            self.require_goal(&db_tx, owner_id, goal_id).await
        })
    }

    /// Add money to a goal and record an `add` activity.
    ///
    /// The target is not a ceiling: a goal can be funded past it.
    pub async fn add_to_goal(
        &self,
        owner_id: &str,
        goal_id: Uuid,
        amount_minor: i64,
        payment_id: Option<String>,
    ) -> ResultEngine<Goal> {
        ensure_positive(amount_minor, "goal deposit")?;
        with_tx!(self, |db_tx| {
            self.credit_goal(&db_tx, owner_id, goal_id, amount_minor, payment_id)
                .await
        })
    }

    /// Take money out of a goal and record a `withdraw` activity.
    pub async fn withdraw_from_goal(
        &self,
        owner_id: &str,
        goal_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<Goal> {
        ensure_positive(amount_minor, "goal withdrawal")?;
        with_tx!(self, |db_tx| {
            let goal = self.require_goal(&db_tx, owner_id, goal_id).await?;

            let updated = goals::Entity::update_many()
                .col_expr(
                    goals::Column::SavedMinor,
                    Expr::col(goals::Column::SavedMinor).sub(amount_minor),
                )
                .filter(goals::Column::Id.eq(goal_id.to_string()))
                .filter(goals::Column::OwnerId.eq(owner_id))
                .filter(goals::Column::SavedMinor.gte(amount_minor))
                .exec(&db_tx)
                .await?;
            if updated.rows_affected == 0 {
                return Err(EngineError::InsufficientFunds(format!(
                    "goal '{}' has {} saved, requested {}",
                    goal.title,
                    MoneyCents::new(goal.saved_minor),
                    MoneyCents::new(amount_minor)
                )));
            }

            let activity =
                GoalActivity::record(&goal, GoalActivityKind::Withdraw, amount_minor, None);
            goal_activity::ActiveModel::from(&activity)
                .insert(&db_tx)
                .await?;

            self.require_goal(&db_tx, owner_id, goal_id).await
        })
    }

    /// Goal funding history of `owner_id`, newest first.
    pub async fn goal_activity(&self, owner_id: &str) -> ResultEngine<Vec<GoalActivity>> {
        let models = goal_activity::Entity::find()
            .filter(goal_activity::Column::OwnerId.eq(owner_id))
            .order_by_desc(goal_activity::Column::OccurredAt)
            .order_by_desc(goal_activity::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(GoalActivity::try_from).collect()
    }

    pub(super) async fn find_goal(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<Option<Goal>> {
        goals::Entity::find_by_id(goal_id.to_string())
            .filter(goals::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .map(Goal::try_from)
            .transpose()
    }

    /// Load a goal owned by `owner_id`; someone else's goal is "not found".
    pub(super) async fn require_goal(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<Goal> {
        self.find_goal(db, owner_id, goal_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }

    pub(super) async fn credit_goal(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        goal_id: Uuid,
        amount_minor: i64,
        payment_id: Option<String>,
    ) -> ResultEngine<Goal> {
        let goal = self.require_goal(db, owner_id, goal_id).await?;

        let updated = goals::Entity::update_many()
            .col_expr(
                goals::Column::SavedMinor,
                Expr::col(goals::Column::SavedMinor).add(amount_minor),
            )
            .filter(goals::Column::Id.eq(goal_id.to_string()))
            .filter(goals::Column::OwnerId.eq(owner_id))
            .filter(goals::Column::SavedMinor.lte(i64::MAX - amount_minor))
            .exec(db)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EngineError::InvalidAmount(format!(
                "adding {} would overflow goal '{}'",
                MoneyCents::new(amount_minor),
                goal.title
            )));
        }

        let activity = GoalActivity::record(&goal, GoalActivityKind::Add, amount_minor, payment_id);
        goal_activity::ActiveModel::from(&activity)
            .insert(db)
            .await?;

        let goal = self.require_goal(db, owner_id, goal_id).await?;
        if goal.reached() {
            tracing::info!(owner_id, goal = %goal.title, "goal target reached");
        }
        Ok(goal)
    }
}

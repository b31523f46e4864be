//! Savings goal endpoints

use api_types::goal::{
    GoalActivityKind, GoalActivityResponse, GoalActivityView, GoalListResponse, GoalNew,
    GoalTransferView, GoalUpdate, GoalView, GoalWithdraw,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Goal, GoalActivity, MoneyCents};

use crate::{Identity, ServerError, parse_id, server::ServerState};

pub(crate) fn goal_view(goal: Goal) -> GoalView {
    GoalView {
        reached: goal.reached(),
        id: goal.id,
        title: goal.title,
        target_minor: goal.target_minor,
        saved_minor: goal.saved_minor,
        created_at: goal.created_at,
    }
}

fn activity_view(activity: GoalActivity) -> GoalActivityView {
    GoalActivityView {
        id: activity.id,
        goal_id: activity.goal_id,
        goal_title: activity.goal_title,
        kind: match activity.kind {
            engine::GoalActivityKind::Add => GoalActivityKind::Add,
            engine::GoalActivityKind::Withdraw => GoalActivityKind::Withdraw,
            engine::GoalActivityKind::GoalDeleted => GoalActivityKind::GoalDeleted,
        },
        amount_minor: activity.amount_minor,
        payment_id: activity.payment_id,
        occurred_at: activity.occurred_at,
    }
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state.engine.list_goals(&identity.user_id).await?;
    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(goal_view).collect(),
    }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(&identity.user_id, &payload.title, payload.target_minor)
        .await?;
    Ok((StatusCode::CREATED, Json(goal_view(goal))))
}

/// Overwrite the saved amount.
pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal_id = parse_id(&id, "goal")?;
    let goal = state
        .engine
        .set_goal_saved(&identity.user_id, goal_id, payload.saved_minor)
        .await?;
    Ok(Json(goal_view(goal)))
}

/// Delete a goal and move its savings to the wallet.
pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<GoalTransferView>, ServerError> {
    let goal_id = parse_id(&id, "goal")?;
    let transfer = state
        .engine
        .delete_goal_and_transfer(&identity.user_id, goal_id)
        .await?;

    let message = format!(
        "Goal deleted and {} transferred to wallet",
        MoneyCents::new(transfer.amount_minor)
    );
    Ok(Json(GoalTransferView {
        goal_id: transfer.goal_id,
        title: transfer.title,
        amount_minor: transfer.amount_minor,
        wallet_balance_minor: transfer.wallet_balance_minor,
        message,
    }))
}

pub async fn withdraw(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalWithdraw>,
) -> Result<Json<GoalView>, ServerError> {
    let goal_id = parse_id(&id, "goal")?;
    let goal = state
        .engine
        .withdraw_from_goal(&identity.user_id, goal_id, payload.amount_minor)
        .await?;
    Ok(Json(goal_view(goal)))
}

pub async fn activity(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<GoalActivityResponse>, ServerError> {
    let activity = state.engine.goal_activity(&identity.user_id).await?;
    Ok(Json(GoalActivityResponse {
        activity: activity.into_iter().map(activity_view).collect(),
    }))
}

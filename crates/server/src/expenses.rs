//! Expense book endpoints

use api_types::expense::{
    CategoryTotal, ExpenseListResponse, ExpenseNew, ExpenseQuery, ExpenseSummaryView, ExpenseView,
    MonthTotal,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Expense, ExpenseFilter};

use crate::{Identity, ServerError, parse_id, server::ServerState};

fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount_minor: expense.amount_minor,
        category: expense.category,
        note: expense.note,
        created_at: expense.created_at,
    }
}

fn filter_from(query: ExpenseQuery) -> ExpenseFilter {
    ExpenseFilter {
        category: query.category,
        from: query.from,
        to: query.to,
    }
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(&identity.user_id, &filter_from(query))
        .await?;
    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(expense_view).collect(),
    }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            &identity.user_id,
            payload.amount_minor,
            &payload.category,
            payload.note.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let expense_id = parse_id(&id, "expense")?;
    state
        .engine
        .delete_expense(&identity.user_id, expense_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Monthly and per-category totals for the report view.
pub async fn summary(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseSummaryView>, ServerError> {
    let summary = state
        .engine
        .expense_summary(&identity.user_id, &filter_from(query))
        .await?;
    Ok(Json(ExpenseSummaryView {
        total_minor: summary.total_minor,
        count: summary.count,
        monthly: summary
            .monthly
            .into_iter()
            .map(|(month, total_minor)| MonthTotal { month, total_minor })
            .collect(),
        by_category: summary
            .by_category
            .into_iter()
            .map(|(category, total_minor)| CategoryTotal {
                category,
                total_minor,
            })
            .collect(),
    }))
}

//! Bill split endpoints

use api_types::split::{SplitListResponse, SplitNew, SplitPersonView, SplitUpdate, SplitView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{EngineError, Split};

use crate::{Identity, ServerError, parse_id, server::ServerState};

fn split_view(split: Split) -> SplitView {
    SplitView {
        num_people: split.num_people(),
        remainder_minor: split.remainder_minor(),
        id: split.id,
        amount_minor: split.amount_minor,
        category: split.category,
        people: split
            .people
            .into_iter()
            .map(|person| SplitPersonView {
                name: person.name,
                amount_minor: person.amount_minor,
                settled: person.settled,
            })
            .collect(),
        settled: split.settled,
        created_at: split.created_at,
    }
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<SplitListResponse>, ServerError> {
    let splits = state.engine.list_splits(&identity.user_id).await?;
    Ok(Json(SplitListResponse {
        splits: splits.into_iter().map(split_view).collect(),
    }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<SplitNew>,
) -> Result<(StatusCode, Json<SplitView>), ServerError> {
    let split = state
        .engine
        .create_split(
            &identity.user_id,
            payload.amount_minor,
            &payload.names,
            &payload.category,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(split_view(split))))
}

/// Settle one person or everyone.
pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SplitUpdate>,
) -> Result<Json<SplitView>, ServerError> {
    let split_id = parse_id(&id, "split")?;
    let split = match (payload.settle_all, payload.person_index) {
        (Some(true), _) => state.engine.settle_all(&identity.user_id, split_id).await?,
        (_, Some(index)) => {
            state
                .engine
                .settle_person(&identity.user_id, split_id, index)
                .await?
        }
        _ => {
            return Err(EngineError::InvalidInput(
                "person_index or settle_all is required".to_string(),
            )
            .into());
        }
    };
    Ok(Json(split_view(split)))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let split_id = parse_id(&id, "split")?;
    state
        .engine
        .delete_split(&identity.user_id, split_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Room endpoints - list, create, patch, delete.

use super::{ApiResult, AppState, require_identity};
use crate::core::room::{self, NewRoom, RoomPatch, RoomWithOccupant};
use crate::entities::room::Model as RoomModel;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};

/// `GET /rooms` - the owner's rooms, ordered by number, with occupant names.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<RoomWithOccupant>>> {
    let identity = require_identity(&state, &headers).await?;
    let rooms = room::list_rooms(&state.db, &identity).await?;
    Ok(Json(rooms))
}

/// `POST /rooms` - create a room, which always starts EMPTY.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewRoom>,
) -> ApiResult<(StatusCode, Json<RoomModel>)> {
    let identity = require_identity(&state, &headers).await?;
    let created =
        room::create_room(&state.db, &identity, state.config.min_monthly_rent, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /rooms/{id}` - partial update, including the manual status toggles.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<RoomPatch>,
) -> ApiResult<Json<RoomModel>> {
    let identity = require_identity(&state, &headers).await?;
    let updated = room::update_room(
        &state.db,
        &identity,
        state.config.min_monthly_rent,
        room_id,
        payload,
    )
    .await?;
    Ok(Json(updated))
}

/// `DELETE /rooms/{id}` - hard delete; refused while the room is occupied.
#[tracing::instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    room::delete_room(&state.db, &identity, room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

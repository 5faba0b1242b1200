//! Room endpoints.
//!
//! Create and list require a session. Lookup and join do not: a room secret
//! is the only thing that gates joining.

use crate::errors::FcError;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateRoomRequest, JoinRoomRequest, RoomView};
use crate::routes::AppState;
use crate::services::room_service;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::secret::ExposeSecret;
use std::sync::Arc;

/// POST /rooms
#[tracing::instrument(skip_all, name = "fc.rooms.create")]
pub async fn handle_create_room(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomView>), FcError> {
    let Json(payload) = payload?;
    let room = room_service::create_room(
        &state.pool,
        &state.credentials,
        user.user_id(),
        &payload.name,
        payload.password.as_ref().map(|p| p.expose_secret()),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(RoomView::from(&room))))
}

/// GET /rooms
#[tracing::instrument(skip_all, name = "fc.rooms.list")]
pub async fn handle_list_rooms(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<RoomView>>, FcError> {
    let rooms = room_service::list_rooms(&state.pool, user.user_id()).await?;
    Ok(Json(rooms.iter().map(RoomView::from).collect()))
}

/// GET /rooms/:id
#[tracing::instrument(skip_all, name = "fc.rooms.get")]
pub async fn handle_get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomView>, FcError> {
    let room = room_service::get_room(&state.pool, &room_id).await?;
    Ok(Json(RoomView::from(&room)))
}

/// POST /rooms/:id/join
///
/// The body is optional; without one the candidate secret is empty.
#[tracing::instrument(skip_all, name = "fc.rooms.join")]
pub async fn handle_join_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    payload: Option<Json<JoinRoomRequest>>,
) -> Result<Json<RoomView>, FcError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let room = room_service::join_room(
        &state.pool,
        &state.room_guard,
        &room_id,
        payload.password.expose_secret(),
    )
    .await?;

    Ok(Json(RoomView::from(&room)))
}

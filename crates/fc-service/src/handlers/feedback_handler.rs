use crate::errors::FcError;
use crate::middleware::AuthenticatedUser;
use crate::models::{Feedback, SubmitFeedbackRequest};
use crate::routes::AppState;
use crate::services::feedback_service;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Submit anonymous feedback
///
/// POST /rooms/:id/feedback
#[tracing::instrument(skip_all, name = "fc.feedback.submit")]
pub async fn handle_submit_feedback(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>), FcError> {
    let Json(payload) = payload?;
    let feedback =
        feedback_service::submit_feedback(&state.pool, &room_id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// List feedback for a room the caller owns
///
/// GET /rooms/:id/feedback
#[tracing::instrument(skip_all, name = "fc.feedback.list")]
pub async fn handle_list_feedback(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<Feedback>>, FcError> {
    let feedback = feedback_service::list_feedback(&state.pool, &room_id, user.user_id()).await?;
    Ok(Json(feedback))
}

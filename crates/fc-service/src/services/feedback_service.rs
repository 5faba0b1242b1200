//! Anonymous feedback submission and owner-only listing.

use crate::errors::FcError;
use crate::models::Feedback;
use crate::observability::metrics::record_feedback_submission;
use crate::repositories::feedback;
use crate::services::room_service::get_room;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const MAX_FEEDBACK_LENGTH: usize = 5000;

/// Store feedback for an existing room. No identity is recorded.
#[instrument(skip_all, fields(room_id = %room_id))]
pub async fn submit_feedback(
    pool: &PgPool,
    room_id: &str,
    content: &str,
) -> Result<Feedback, FcError> {
    let content = sanitize_input(content);
    if content.is_empty() {
        record_feedback_submission("invalid");
        return Err(FcError::BadRequest(
            "Feedback content is required".to_string(),
        ));
    }
    if content.chars().count() > MAX_FEEDBACK_LENGTH {
        record_feedback_submission("invalid");
        return Err(FcError::BadRequest(format!(
            "Feedback must be at most {} characters",
            MAX_FEEDBACK_LENGTH
        )));
    }

    let room = get_room(pool, room_id).await?;
    let created = feedback::create_feedback(pool, &room.id, &content).await?;

    record_feedback_submission("success");
    Ok(created)
}

/// Feedback for a room, visible only to its owner.
#[instrument(skip_all, fields(room_id = %room_id))]
pub async fn list_feedback(
    pool: &PgPool,
    room_id: &str,
    caller_id: Uuid,
) -> Result<Vec<Feedback>, FcError> {
    let room = get_room(pool, room_id).await?;

    if room.owner_id != caller_id {
        tracing::debug!(target: "fc.feedback", "Feedback listing denied: caller is not owner");
        return Err(FcError::Forbidden(
            "Only the room owner can view feedback".to_string(),
        ));
    }

    feedback::list_by_room(pool, &room.id).await
}

/// Strip anything that looks like an HTML tag, then trim.
///
/// An unterminated `<` is kept as text.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);
        match from_open.find('>') {
            Some(close) => rest = from_open.get(close + 1..).unwrap_or_default(),
            None => {
                out.push_str(from_open);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

//! Feedback repository. Rows are append-only.

use crate::errors::FcError;
use crate::models::Feedback;
use sqlx::PgPool;

pub async fn create_feedback(
    pool: &PgPool,
    room_id: &str,
    content: &str,
) -> Result<Feedback, FcError> {
    let feedback = sqlx::query_as::<_, Feedback>(
        r#"
        INSERT INTO feedback (room_id, content)
        VALUES ($1, $2)
        RETURNING id, room_id, content, sentiment, created_at
        "#,
    )
    .bind(room_id)
    .bind(content)
    .fetch_one(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to create feedback: {}", e)))?;

    Ok(feedback)
}

/// Feedback for a room, newest first.
pub async fn list_by_room(pool: &PgPool, room_id: &str) -> Result<Vec<Feedback>, FcError> {
    let feedback = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, room_id, content, sentiment, created_at
        FROM feedback
        WHERE room_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to list feedback: {}", e)))?;

    Ok(feedback)
}

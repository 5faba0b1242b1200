//! Room repository.
//!
//! `is_password_protected` is never written here; PostgreSQL derives it from
//! `password_hash`.

use crate::errors::FcError;
use crate::models::Room;
use crate::repositories::is_unique_violation;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a room under a caller-chosen id.
///
/// Returns `Ok(None)` when the id is already taken so the caller can draw a
/// new one.
pub async fn create_room(
    pool: &PgPool,
    id: &str,
    name: &str,
    owner_id: Uuid,
    password_hash: Option<&str>,
) -> Result<Option<Room>, FcError> {
    let result = sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (id, name, owner_id, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, owner_id, password_hash, is_password_protected, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(owner_id)
    .bind(password_hash)
    .fetch_one(pool)
    .await;

    match result {
        Ok(room) => Ok(Some(room)),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(FcError::Database(format!("Failed to create room: {}", e))),
    }
}

pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Option<Room>, FcError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, owner_id, password_hash, is_password_protected, created_at
        FROM rooms
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to fetch room: {}", e)))?;

    Ok(room)
}

/// Rooms owned by `owner_id`, newest first.
pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Room>, FcError> {
    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, owner_id, password_hash, is_password_protected, created_at
        FROM rooms
        WHERE owner_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to list rooms: {}", e)))?;

    Ok(rooms)
}

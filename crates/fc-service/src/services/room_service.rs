//! Room creation, lookup and join.

use crate::crypto::CredentialStore;
use crate::errors::FcError;
use crate::models::Room;
use crate::observability::metrics::{record_room_created, record_room_join};
use crate::repositories::rooms;
use crate::services::feedback_service::sanitize_input;
use crate::services::room_access::RoomAccessGuard;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub const ROOM_ID_LENGTH: usize = 6;
const MAX_ROOM_NAME_LENGTH: usize = 100;
/// Id collisions are rare at 62^6; give up after a handful.
const MAX_ROOM_ID_ATTEMPTS: usize = 5;

/// Create a room owned by `owner_id`.
///
/// A missing or empty password creates an open room. Otherwise the password
/// is hashed and the room is protected.
#[instrument(skip_all, fields(owner_id = %owner_id))]
pub async fn create_room(
    pool: &PgPool,
    credentials: &CredentialStore,
    owner_id: Uuid,
    name: &str,
    password: Option<&str>,
) -> Result<Room, FcError> {
    let name = sanitize_input(name);
    if name.is_empty() {
        return Err(FcError::BadRequest("Room name is required".to_string()));
    }
    if name.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(FcError::BadRequest(format!(
            "Room name must be at most {} characters",
            MAX_ROOM_NAME_LENGTH
        )));
    }

    let password_hash = match password.filter(|p| !p.is_empty()) {
        Some(p) => Some(credentials.hash_blocking(p.to_string()).await?),
        None => None,
    };

    for attempt in 1..=MAX_ROOM_ID_ATTEMPTS {
        let id = generate_room_id();
        if let Some(room) =
            rooms::create_room(pool, &id, &name, owner_id, password_hash.as_deref()).await?
        {
            record_room_created(room.is_password_protected);
            tracing::info!(
                target: "fc.rooms",
                room_id = %room.id,
                protected = room.is_password_protected,
                "Room created"
            );
            return Ok(room);
        }
        tracing::debug!(target: "fc.rooms", attempt, "Room id collision, retrying");
    }

    tracing::error!(
        target: "fc.rooms",
        attempts = MAX_ROOM_ID_ATTEMPTS,
        "Could not allocate a unique room id"
    );
    Err(FcError::Internal)
}

/// Rooms owned by `owner_id`, newest first.
pub async fn list_rooms(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Room>, FcError> {
    rooms::list_by_owner(pool, owner_id).await
}

/// Fetch a room by id. Ids that cannot exist are treated as not found
/// without touching the database.
pub async fn get_room(pool: &PgPool, room_id: &str) -> Result<Room, FcError> {
    if !is_valid_room_id(room_id) {
        return Err(room_not_found());
    }

    rooms::get_by_id(pool, room_id)
        .await?
        .ok_or_else(room_not_found)
}

/// Join a room with a candidate secret.
///
/// Caller identity is not consulted.
#[instrument(skip_all, fields(room_id = %room_id))]
pub async fn join_room(
    pool: &PgPool,
    guard: &RoomAccessGuard,
    room_id: &str,
    candidate: &str,
) -> Result<Room, FcError> {
    let room = match get_room(pool, room_id).await {
        Ok(room) => room,
        Err(e) => {
            if matches!(e, FcError::NotFound(_)) {
                record_room_join("not_found");
            }
            return Err(e);
        }
    };

    match guard
        .check_join_blocking(room.clone(), candidate.to_string())
        .await
    {
        Ok(()) => {
            record_room_join("success");
            Ok(room)
        }
        Err(e) => {
            tracing::debug!(target: "fc.rooms", "Join rejected: wrong room secret");
            record_room_join("wrong_secret");
            Err(e.into())
        }
    }
}

/// Exactly six ASCII letters or digits.
pub fn is_valid_room_id(room_id: &str) -> bool {
    room_id.len() == ROOM_ID_LENGTH && room_id.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn generate_room_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_ID_LENGTH)
        .map(char::from)
        .collect()
}

fn room_not_found() -> FcError {
    FcError::NotFound("Room not found".to_string())
}

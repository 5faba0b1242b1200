//! Room join gate.
//!
//! Joining is decided by the room secret alone. Caller identity plays no part:
//! owning a room and holding its secret are separate capabilities, and a
//! valid session grants nothing here.

use crate::crypto::CredentialStore;
use crate::errors::{CredentialError, RoomAccessError};
use crate::models::Room;
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct RoomAccessGuard {
    credentials: CredentialStore,
}

impl RoomAccessGuard {
    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// Decide whether `candidate` opens `room`.
    ///
    /// Open rooms accept anything, the empty string included. Protected rooms
    /// accept only an exact match against the stored hash. A protected room
    /// whose hash is missing or unreadable rejects everyone.
    #[instrument(skip_all, fields(room_id = %room.id))]
    pub fn check_join(&self, room: &Room, candidate: &str) -> Result<(), RoomAccessError> {
        if !room.is_password_protected {
            return Ok(());
        }

        let Some(hash) = room.password_hash.as_deref() else {
            tracing::error!(
                target: "fc.rooms",
                "Protected room has no stored secret hash; denying join"
            );
            return Err(RoomAccessError::WrongSecret);
        };

        match self.credentials.verify(hash, candidate) {
            Ok(true) => Ok(()),
            Ok(false) => Err(RoomAccessError::WrongSecret),
            Err(CredentialError::MalformedHash | CredentialError::HashFailure) => {
                tracing::error!(
                    target: "fc.rooms",
                    "Stored room secret hash is unreadable; denying join"
                );
                Err(RoomAccessError::WrongSecret)
            }
        }
    }

    /// [`check_join`](Self::check_join) on the blocking pool.
    pub async fn check_join_blocking(
        &self,
        room: Room,
        candidate: String,
    ) -> Result<(), RoomAccessError> {
        if !room.is_password_protected {
            return Ok(());
        }

        let guard = *self;
        tokio::task::spawn_blocking(move || guard.check_join(&room, &candidate))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(target: "fc.rooms", error = %e, "Join check task failed");
                Err(RoomAccessError::WrongSecret)
            })
    }
}

//! Data models and API request/response types.
//!
//! Storage rows (`Account`, `Room`) carry password hashes and are never
//! serialized. Handlers convert them into the `*View` types first.

use chrono::{DateTime, Utc};
use common::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Storage rows
// ============================================================================

/// Account row (maps to `accounts` table).
#[derive(Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub subscription_type: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .field("subscription_type", &self.subscription_type)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Room row (maps to `rooms` table).
///
/// `is_password_protected` is a generated column; it always equals
/// `password_hash.is_some()`.
#[derive(Clone, sqlx::FromRow)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub owner_id: Uuid,
    pub password_hash: Option<String>,
    pub is_password_protected: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner_id", &self.owner_id)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field("is_password_protected", &self.is_password_protected)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Feedback row (maps to `feedback` table). Contains nothing secret.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub room_id: String,
    pub content: String,
    pub sentiment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Public views
// ============================================================================

/// Outward-facing account representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub subscription_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            subscription_type: account.subscription_type.clone(),
            created_at: account.created_at,
        }
    }
}

/// Outward-facing room representation, secret stripped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomView {
    pub id: String,
    pub name: String,
    pub owner_id: Uuid,
    pub is_password_protected: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            owner_id: room.owner_id,
            is_password_protected: room.is_password_protected,
            created_at: room.created_at,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /auth/register` and `POST /auth/login`.
///
/// Missing fields deserialize to empty values so they fail validation with
/// a 400 instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: String,
    /// Absent or empty means the room is open.
    #[serde(default)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

impl Default for JoinRoomRequest {
    fn default() -> Self {
        Self {
            password: empty_secret(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub content: String,
}

fn empty_secret() -> SecretString {
    SecretString::from("")
}

// ============================================================================
// Responses
// ============================================================================

/// Token plus account, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountView,
}

/// Readiness probe body.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

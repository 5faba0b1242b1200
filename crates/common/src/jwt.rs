//! Session token claims and constants shared by the service and its tests.
//!
//! Session tokens are compact HS256 JWTs carrying a [`SessionClaims`] payload.
//! They are never stored server-side; expiry is the only way they stop working.
//!
//! # Usage
//!
//! ```rust
//! use common::jwt::{SessionClaims, TOKEN_ISSUER, TOKEN_LIFETIME_SECONDS};
//! use uuid::Uuid;
//!
//! let claims = SessionClaims::new(Uuid::nil(), 1_700_000_000);
//! assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
//! assert_eq!(claims.iss, TOKEN_ISSUER);
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted token size in bytes (4KB).
///
/// Checked before any base64 decoding or signature work. A normal session
/// token is around 250 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Value of the `iss` claim on every session token.
pub const TOKEN_ISSUER: &str = "feedback-collector";

/// Fixed session lifetime (24 hours).
pub const TOKEN_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

/// The only signing algorithm accepted, as it appears in the JWT header.
pub const SIGNING_ALGORITHM: &str = "HS256";

// =============================================================================
// Claims
// =============================================================================

/// Claims carried by a session token.
///
/// `user_id` is redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account the token was issued to.
    pub user_id: Uuid,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Not-before timestamp (Unix epoch seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issuer tag, always [`TOKEN_ISSUER`] for tokens minted here.
    pub iss: String,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("user_id", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("iss", &self.iss)
            .finish()
    }
}

impl SessionClaims {
    /// Build claims for `user_id` issued at `now`, valid for the fixed lifetime.
    #[must_use]
    pub fn new(user_id: Uuid, now: i64) -> Self {
        Self {
            user_id,
            iat: now,
            nbf: now,
            exp: now.saturating_add(TOKEN_LIFETIME_SECONDS),
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    /// True while `now` lies inside `[nbf, exp]`.
    #[must_use]
    pub fn is_valid_at(&self, now: i64) -> bool {
        now >= self.nbf && now <= self.exp
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Read the `alg` field from a token header without verifying anything.
///
/// Only meant for logging why a token was refused. Returns `None` for
/// oversized tokens or anything that is not `header.payload.signature`.
#[must_use]
pub fn peek_algorithm(token: &str) -> Option<String> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        return None;
    }

    let mut parts = token.split('.');
    let header = parts.next()?;
    if parts.count() != 2 {
        return None;
    }

    let header_bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&header_bytes).ok()?;

    header.get("alg")?.as_str().map(str::to_string)
}

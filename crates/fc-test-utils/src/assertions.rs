//! Custom test assertions for expressive tests

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::jwt::{SessionClaims, SIGNING_ALGORITHM, TOKEN_ISSUER, TOKEN_LIFETIME_SECONDS};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    alg: String,
}

/// Assertions on a session token string.
///
/// These only decode; signature checks belong to the server.
///
/// # Example
/// ```rust,ignore
/// token.assert_valid_jwt().assert_for_user(user_id);
/// ```
pub trait TokenAssertions {
    /// Three base64url parts, HS256 header, claims with a 24 hour window.
    fn assert_valid_jwt(&self) -> &Self;

    fn assert_for_user(&self, user_id: Uuid) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<&str> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader = serde_json::from_slice(
            &URL_SAFE_NO_PAD
                .decode(parts[0])
                .expect("JWT header should be base64url"),
        )
        .expect("JWT header should be JSON");
        assert_eq!(header.alg, SIGNING_ALGORITHM, "Expected HS256 algorithm");

        let claims = decode_claims(self);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
        assert!(!parts[2].is_empty(), "JWT signature must not be empty");

        self
    }

    fn assert_for_user(&self, user_id: Uuid) -> &Self {
        assert_eq!(decode_claims(self).user_id, user_id);
        self
    }
}

/// Decode the claims segment without verifying the signature.
pub fn decode_claims(token: &str) -> SessionClaims {
    let payload = token
        .split('.')
        .nth(1)
        .expect("JWT should have a payload segment");
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .expect("JWT payload should be base64url");
    serde_json::from_slice(&bytes).expect("JWT payload should decode into SessionClaims")
}

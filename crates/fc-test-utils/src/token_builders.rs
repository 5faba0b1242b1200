//! Builder for hand-made session tokens
//!
//! Lets tests produce tokens the server would never issue: expired, not yet
//! valid, wrong issuer, wrong algorithm, wrong key.

use crate::test_ids::{TEST_JWT_SECRET, TEST_USER_ALICE};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use common::jwt::{TOKEN_ISSUER, TOKEN_LIFETIME_SECONDS};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

/// # Example
/// ```rust,ignore
/// let expired = TestTokenBuilder::new()
///     .for_user(TEST_USER_ALICE)
///     .issued_at(Utc::now().timestamp() - 2 * 86_400)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    user_id: Uuid,
    iat: i64,
    nbf: i64,
    exp: i64,
    iss: String,
    secret: String,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Defaults match what the test server issues right now.
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id: TEST_USER_ALICE,
            iat: now,
            nbf: now,
            exp: now + TOKEN_LIFETIME_SECONDS,
            iss: TOKEN_ISSUER.to_string(),
            secret: TEST_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.user_id = user_id;
        self
    }

    /// Shift the whole validity window so it starts at `timestamp`.
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self.nbf = timestamp;
        self.exp = timestamp + TOKEN_LIFETIME_SECONDS;
        self
    }

    pub fn not_before(mut self, timestamp: i64) -> Self {
        self.nbf = timestamp;
        self
    }

    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.exp = timestamp;
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Claims as JSON.
    pub fn build(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "iat": self.iat,
            "nbf": self.nbf,
            "exp": self.exp,
            "iss": self.iss,
        })
    }

    /// Sign with the configured HMAC algorithm and secret.
    pub fn sign(self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.build(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("HMAC signing of JSON claims cannot fail")
    }

    /// Unsigned token with `"alg":"none"`.
    pub fn sign_none(self) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(self.build().to_string());
        format!("{header}.{payload}.")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

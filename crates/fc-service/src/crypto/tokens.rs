//! Session token issuance and verification (HS256 JWT).

use crate::config::Config;
use crate::errors::{AuthError, FcError};
use crate::observability::metrics::{record_token_issuance, record_token_validation};
use common::jwt::{peek_algorithm, SessionClaims, MAX_JWT_SIZE_BYTES, TOKEN_ISSUER};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::instrument;
use uuid::Uuid;

/// Issues and verifies stateless session tokens.
///
/// Keys are derived once from the configured secret. The only accepted
/// algorithm is HS256; any other `alg` header, `none` included, is refused
/// before the signature is looked at. There is no clock-skew leeway.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &"HS256")
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        let key_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // exp and nbf are compared against an explicit `now` in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);
        validation.set_issuer(&[TOKEN_ISSUER]);

        Self {
            encoding_key: EncodingKey::from_secret(key_bytes),
            decoding_key: DecodingKey::from_secret(key_bytes),
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Mint a token for `user_id`, valid for 24 hours from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, FcError> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    #[instrument(skip_all)]
    pub fn issue_at(&self, user_id: Uuid, now: i64) -> Result<String, FcError> {
        let claims = SessionClaims::new(user_id, now);

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        match encode(&header, &claims, &self.encoding_key) {
            Ok(token) => {
                record_token_issuance("success");
                Ok(token)
            }
            Err(e) => {
                tracing::error!(target: "fc.crypto", error = %e, "Token signing failed");
                record_token_issuance("error");
                Err(FcError::Internal)
            }
        }
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix seconds).
    ///
    /// Rejects, in order: oversized input (`Malformed`), an algorithm other
    /// than HS256 or a signature mismatch (`BadSignature`), unparseable
    /// structure or claims (`Malformed`), and `now` outside `[nbf, exp]`
    /// (`Expired`).
    #[instrument(skip_all)]
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, AuthError> {
        let result = self.check(token, now);

        match &result {
            Ok(_) => record_token_validation("success", None),
            Err(reason) => record_token_validation("error", Some(reason.as_label())),
        }

        result
    }

    fn check(&self, token: &str, now: i64) -> Result<SessionClaims, AuthError> {
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "fc.crypto",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(AuthError::Malformed);
        }

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let reason = classify(e.kind());
                tracing::debug!(
                    target: "fc.crypto",
                    error = %e,
                    offered_alg = peek_algorithm(token).as_deref().unwrap_or("unknown"),
                    reason = reason.as_label(),
                    "Token verification failed"
                );
                reason
            })?;

        let claims = token_data.claims;

        if !claims.is_valid_at(now) {
            tracing::debug!(
                target: "fc.crypto",
                nbf = claims.nbf,
                exp = claims.exp,
                now,
                "Token rejected: outside validity window"
            );
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}

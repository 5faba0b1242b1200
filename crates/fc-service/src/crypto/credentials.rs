//! Password and room secret hashing.

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::CredentialError;
use crate::observability::metrics::record_password_hash;
use std::time::Instant;
use tracing::instrument;

/// Adaptive one-way hashing for account passwords and room secrets.
///
/// Output is a bcrypt modular-crypt string (`$2b$<cost>$<salt><digest>`), so
/// salt and cost travel with the hash and `verify` needs nothing else.
/// Neither operation logs its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialStore {
    cost: u32,
}

impl CredentialStore {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `secret` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// `HashFailure` if the cost is outside 10-14 or bcrypt itself fails.
    #[instrument(skip_all)]
    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        // Config validates the range too; a store built by hand must not
        // produce weak hashes.
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.cost) {
            tracing::error!(
                target: "fc.crypto",
                cost = self.cost,
                "Refusing to hash with out-of-range bcrypt cost"
            );
            return Err(CredentialError::HashFailure);
        }

        let start = Instant::now();
        let result = bcrypt::hash(secret, self.cost).map_err(|e| {
            tracing::error!(target: "fc.crypto", error = %e, "Password hashing failed");
            CredentialError::HashFailure
        });

        let status = if result.is_ok() { "success" } else { "error" };
        record_password_hash("hash", status, start.elapsed());

        result
    }

    /// Check `candidate` against a stored hash in constant time.
    ///
    /// A plain mismatch is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// `MalformedHash` if `hash` is not a parseable bcrypt string.
    #[instrument(skip_all)]
    pub fn verify(&self, hash: &str, candidate: &str) -> Result<bool, CredentialError> {
        let start = Instant::now();
        let result = bcrypt::verify(candidate, hash).map_err(|e| {
            tracing::debug!(target: "fc.crypto", error = %e, "Stored hash could not be parsed");
            CredentialError::MalformedHash
        });

        let status = match result {
            Ok(true) => "match",
            Ok(false) => "mismatch",
            Err(_) => "error",
        };
        record_password_hash("verify", status, start.elapsed());

        result
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, secret: String) -> Result<String, CredentialError> {
        let store = *self;
        tokio::task::spawn_blocking(move || store.hash(&secret))
            .await
            .map_err(|e| {
                tracing::error!(target: "fc.crypto", error = %e, "Hashing task failed");
                CredentialError::HashFailure
            })?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        hash: String,
        candidate: String,
    ) -> Result<bool, CredentialError> {
        let store = *self;
        tokio::task::spawn_blocking(move || store.verify(&hash, &candidate))
            .await
            .map_err(|e| {
                tracing::error!(target: "fc.crypto", error = %e, "Verification task failed");
                CredentialError::HashFailure
            })?
    }
}

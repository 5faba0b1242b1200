//! Observability for the Feedback Collector service.
//!
//! # Privacy by Default
//!
//! Handlers and services use `#[instrument(skip_all)]` and add fields
//! explicitly. Fields fall into three groups:
//! - **SAFE**: plaintext (room ids, outcomes, counts)
//! - **HASHED**: correlated through [`hash_for_correlation`] (emails)
//! - **NEVER**: passwords, room secrets, tokens, hashes, the signing key

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Used for emails, so failed logins for the same address can be grouped
/// without writing the address itself.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}

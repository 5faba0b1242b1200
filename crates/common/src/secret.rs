//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for account passwords, room secrets
//! and the token signing key. `SecretString` redacts itself in `Debug`, so a
//! request struct deriving `Debug` stays safe to log.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct JoinRoom {
//!     room_id: String,
//!     password: SecretString,
//! }
//!
//! let req = JoinRoom {
//!     room_id: "abc123".to_string(),
//!     password: SecretString::from("topsecret"),
//! };
//!
//! assert!(!format!("{req:?}").contains("topsecret"));
//! assert_eq!(req.password.expose_secret(), "topsecret");
//! ```
//!
//! With the `serde` feature (enabled at the workspace level) secrets can be
//! deserialized straight out of JSON request bodies.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

//! Cryptographic primitives: bcrypt credential hashing and HS256 session tokens.
//!
//! Both types are immutable after construction and shared through
//! `AppState`; neither holds per-request state.

mod credentials;
mod tokens;

pub use credentials::CredentialStore;
pub use tokens::TokenService;

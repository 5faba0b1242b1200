//! Feedback Collector Service Library
//!
//! Accounts, rooms and anonymous feedback, with stateless session tokens.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing (`CredentialStore`) and session tokens (`TokenService`)
//! - `errors` - Error types and HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Request authentication and HTTP metrics
//! - `models` - Data models
//! - `observability` - Metrics and log-safe hashing
//! - `repositories` - Database access layer
//! - `routes` - Router and application state
//! - `services` - Business logic layer, including the room join gate

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;

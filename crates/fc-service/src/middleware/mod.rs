//! HTTP middleware and request extractors.

pub mod auth;
pub mod http_metrics;

pub use auth::{authenticate, extract_bearer_token, AuthenticatedUser};
pub use http_metrics::http_metrics_middleware;

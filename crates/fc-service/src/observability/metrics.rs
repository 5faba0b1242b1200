//! Metrics definitions for the Feedback Collector service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `fc_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: small fixed sets per metric (success, error, denied, ...)
//! - `error_category`: the five `AuthError` labels plus `none`
//! - `operation`: hash, verify
//! - `endpoint`: normalized route templates, never raw room ids

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and return the handle served at `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder cannot be installed (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("fc_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // bcrypt at cost 10-14 sits between ~50ms and ~1s
        .set_buckets_for_metric(
            Matcher::Prefix("fc_password_hash".to_string()),
            &[0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 0.800, 1.200, 2.000],
        )
        .map_err(|e| format!("Failed to set password hash buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record an HTTP request.
///
/// Metric: `fc_http_request_duration_seconds`, `fc_http_requests_total`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);
    let status = categorize_status_code(status_code);

    histogram!("fc_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("fc_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse room ids out of request paths.
fn normalize_endpoint(path: &str) -> String {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    match segments.as_slice() {
        ["", "rooms", _] => "/rooms/{id}".to_string(),
        ["", "rooms", _, "join"] => "/rooms/{id}/join".to_string(),
        ["", "rooms", _, "feedback"] => "/rooms/{id}/feedback".to_string(),
        ["", "api", "rooms", _] => "/api/rooms/{id}".to_string(),
        ["", "api", "rooms", _, "join"] => "/api/rooms/{id}/join".to_string(),
        ["", "api", "rooms", _, "feedback"] => "/api/rooms/{id}/feedback".to_string(),
        ["", "api", "public", "rooms", _] => "/api/public/rooms/{id}".to_string(),
        ["", "api", "public", "rooms", _, "join"] => "/api/public/rooms/{id}/join".to_string(),
        ["", "api", "public", "rooms", _, "feedback"] => {
            "/api/public/rooms/{id}/feedback".to_string()
        }
        ["", "rooms"] | ["", "api", "rooms"] | ["", "auth", _] | ["", "api", "auth", _] => {
            path.trim_end_matches('/').to_string()
        }
        [""] | ["", "health"] | ["", "ready"] | ["", "metrics"] => path.to_string(),
        _ => "/other".to_string(),
    }
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record a session token issuance.
///
/// Metric: `fc_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str) {
    counter!("fc_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record a session token validation result.
///
/// Metric: `fc_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("fc_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

// ============================================================================
// Credential Metrics
// ============================================================================

/// Record a bcrypt hash or verify call.
///
/// Metric: `fc_password_hash_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_password_hash(operation: &str, status: &str, duration: Duration) {
    histogram!("fc_password_hash_duration_seconds", "operation" => operation.to_string(), "status" => status.to_string())
        .record(duration.as_secs_f64());
}

// ============================================================================
// Account Metrics
// ============================================================================

/// Metric: `fc_registrations_total`
/// Labels: `status` (success, duplicate, invalid, error)
pub fn record_registration(status: &str) {
    counter!("fc_registrations_total", "status" => status.to_string()).increment(1);
}

/// Metric: `fc_logins_total`
/// Labels: `status` (success, invalid_credentials, error)
pub fn record_login(status: &str) {
    counter!("fc_logins_total", "status" => status.to_string()).increment(1);
}

// ============================================================================
// Room Metrics
// ============================================================================

/// Metric: `fc_rooms_created_total`
/// Labels: `protected` (true, false)
pub fn record_room_created(protected: bool) {
    counter!("fc_rooms_created_total", "protected" => protected.to_string()).increment(1);
}

/// Metric: `fc_room_joins_total`
/// Labels: `status` (granted, denied)
pub fn record_room_join(status: &str) {
    counter!("fc_room_joins_total", "status" => status.to_string()).increment(1);
}

/// Metric: `fc_feedback_submissions_total`
/// Labels: `status` (success, invalid, not_found, error)
pub fn record_feedback_submission(status: &str) {
    counter!("fc_feedback_submissions_total", "status" => status.to_string()).increment(1);
}

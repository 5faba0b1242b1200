//! HTTP routes for the Feedback Collector.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::crypto::{CredentialStore, TokenService};
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::room_access::RoomAccessGuard;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
///
/// Built once at startup from [`Config`] and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Password hashing for accounts and room secrets.
    pub credentials: CredentialStore,

    /// Session token signing and verification.
    pub tokens: TokenService,

    /// Room join gate.
    pub room_guard: RoomAccessGuard,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let credentials = CredentialStore::new(config.bcrypt_cost);
        Self {
            pool,
            tokens: TokenService::from_config(&config),
            room_guard: RoomAccessGuard::new(credentials),
            credentials,
            config,
        }
    }
}

/// Build the application routes.
///
/// - `/health`, `/ready`, `/metrics` - operational, public
/// - `/auth/register`, `/auth/login` - public
/// - `/auth/me` - bearer
/// - `/rooms` - bearer (create, list own)
/// - `/rooms/:id`, `/rooms/:id/join` - public
/// - `/rooms/:id/feedback` - POST public, GET owner only
///
/// Everything except the operational endpoints is also served under `/api`,
/// and the public room endpoints under `/api/public`.
/// Authentication is per handler through the `AuthenticatedUser` extractor.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let cors = build_cors(&state.config);
    let request_timeout = state.config.request_timeout;

    let api_routes: Router<Arc<AppState>> = Router::new()
        .route("/auth/register", post(handlers::handle_register))
        .route("/auth/login", post(handlers::handle_login))
        .route("/auth/me", get(handlers::handle_me))
        .route(
            "/rooms",
            post(handlers::handle_create_room).get(handlers::handle_list_rooms),
        )
        .route("/rooms/:id", get(handlers::handle_get_room))
        .route("/rooms/:id/join", post(handlers::handle_join_room))
        .route(
            "/rooms/:id/feedback",
            post(handlers::handle_submit_feedback).get(handlers::handle_list_feedback),
        );

    // Unauthenticated subset, kept for clients of the /api/public paths
    let public_routes: Router<Arc<AppState>> = Router::new()
        .route("/rooms/:id", get(handlers::handle_get_room))
        .route("/rooms/:id/join", post(handlers::handle_join_room))
        .route("/rooms/:id/feedback", post(handlers::handle_submit_feedback));

    // Same API at the root and under /api
    let app_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .nest("/api/public", public_routes)
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. CorsLayer
    // 3. TraceLayer
    // 4. http_metrics_middleware (outermost, sees every response)
    app_routes
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}

fn build_cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

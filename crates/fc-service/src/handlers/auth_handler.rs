use crate::errors::FcError;
use crate::middleware::AuthenticatedUser;
use crate::models::{AccountView, AuthResponse, CredentialsRequest};
use crate::routes::AppState;
use crate::services::account_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use common::secret::ExposeSecret;
use std::sync::Arc;

/// Handle registration
///
/// POST /auth/register
#[tracing::instrument(skip_all, name = "fc.auth.register")]
pub async fn handle_register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), FcError> {
    let Json(payload) = payload?;
    let response = account_service::register(
        &state.pool,
        &state.credentials,
        &state.tokens,
        &payload.email,
        payload.password.expose_secret(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handle login
///
/// POST /auth/login
#[tracing::instrument(skip_all, name = "fc.auth.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, FcError> {
    let Json(payload) = payload?;
    let response = account_service::login(
        &state.pool,
        &state.credentials,
        &state.tokens,
        &payload.email,
        payload.password.expose_secret(),
    )
    .await?;

    Ok(Json(response))
}

/// Current account
///
/// GET /auth/me
#[tracing::instrument(skip_all, name = "fc.auth.me")]
pub async fn handle_me(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<AccountView>, FcError> {
    let account = account_service::get_account(&state.pool, user.user_id()).await?;
    Ok(Json(AccountView::from(&account)))
}

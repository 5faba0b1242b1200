//! Bearer token authentication for protected routes.
//!
//! Handlers that need a caller identity take an [`AuthenticatedUser`]
//! argument. Extraction runs before the handler body; on any failure the
//! request is answered with 401 and the handler never runs.

use crate::crypto::TokenService;
use crate::errors::{AuthError, FcError};
use crate::observability::metrics::record_token_validation;
use crate::routes::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use uuid::Uuid;

/// A caller whose session token verified.
///
/// Fields are private and there is no public constructor, so the only way
/// to obtain one is through [`authenticate`] or the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: Uuid,
    expires_at: i64,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Token expiry as Unix seconds.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The header must split on a single space into exactly two parts, the
/// first being `Bearer`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// Resolve the caller from request headers.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer_token(headers).inspect_err(|reason| {
        record_token_validation("error", Some(reason.as_label()));
    })?;

    let claims = tokens.verify(token).inspect_err(|reason| {
        tracing::debug!(
            target: "fc.middleware.auth",
            reason = reason.as_label(),
            "Request authentication failed"
        );
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
        expires_at: claims.exp,
    })
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = FcError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.tokens).map_err(FcError::from)
    }
}

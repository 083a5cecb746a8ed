//! Credential gateway extractor.
//!
//! Every mutating or user-scoped endpoint takes [`CurrentUser`] as an
//! argument, which forces the token exchange to happen before the handler
//! body runs. Menu listing, registration and login simply do not take it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use sabor_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The identity resolved from the request's bearer token.
///
/// # Failure order
///
/// A missing or non-`Bearer` header fails with `Unauthenticated` before any
/// call to the auth service; a present token that the auth service rejects
/// fails with `InvalidCredential`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = bearer_token(header).ok_or(ApiError::Unauthenticated)?;

        let user_id = state.auth().resolve_token(token).await.map_err(|err| {
            tracing::debug!(error = %err, "bearer token exchange failed");
            ApiError::InvalidCredential(err.upstream_message())
        })?;

        Ok(Self(user_id))
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Only the `Bearer <token>` form is accepted.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

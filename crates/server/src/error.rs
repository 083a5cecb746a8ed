//! Unified error handling with Sentry integration.
//!
//! One discrete user-visible status + message per failure kind; nothing is
//! retried and nothing crosses from one flow into another. All route handlers
//! return `Result<T, ApiError>`. Failure bodies are
//! `{ "error": message, "code": kind }` so clients can tell the partial
//! registration states apart (retry registration vs fall back to login).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type for the order backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required input; no external call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No bearer token was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// A token or password was presented but rejected by the auth service.
    /// Carries the upstream message verbatim, same as registration.
    #[error("invalid credentials: {0}")]
    InvalidCredential(String),

    /// The auth service refused the signup (duplicate email, weak password).
    /// Carries the upstream message verbatim so the client can correct input.
    #[error("registration rejected: {0}")]
    RegistrationRejected(String),

    /// Identity was created but the profile row insert failed. No rollback is
    /// attempted; operators reconcile from this distinct state.
    #[error("profile persistence failed: {0}")]
    ProfilePersistFailure(#[source] BackendError),

    /// Identity and profile exist but no session token could be issued; the
    /// account remains usable via a normal login.
    #[error("session issuance failed: {0}")]
    SessionIssueFailure(#[source] BackendError),

    /// Generic backing-store failure.
    #[error("store error: {0}")]
    Persistence(#[from] BackendError),

    /// A stored payload could not be decoded on read.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}

impl ApiError {
    /// Machine-readable failure kind, stable across releases.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidCredential(_) => "invalid_credential",
            Self::RegistrationRejected(_) => "registration_rejected",
            Self::ProfilePersistFailure(_) => "profile_persist_failure",
            Self::SessionIssueFailure(_) => "session_issue_failure",
            Self::Persistence(_) => "persistence_error",
            Self::DataIntegrity(_) => "data_integrity_error",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::RegistrationRejected(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            Self::ProfilePersistFailure(_)
            | Self::SessionIssueFailure(_)
            | Self::Persistence(_)
            | Self::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Internal details stay in the logs;
    /// upstream auth messages are passed through on registration and login,
    /// where the client needs them to correct its input.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Unauthenticated => "authentication required".to_owned(),
            Self::RegistrationRejected(upstream) | Self::InvalidCredential(upstream) => {
                upstream.clone()
            }
            Self::ProfilePersistFailure(_) => {
                "account created but the profile could not be saved; please contact support"
                    .to_owned()
            }
            Self::SessionIssueFailure(_) => {
                "account created but automatic sign-in failed; please log in".to_owned()
            }
            Self::Persistence(_) => "store error".to_owned(),
            Self::DataIntegrity(_) => "stored order data could not be read".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry; client errors are noise.
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                code = self.code(),
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let body = json!({
            "error": self.client_message(),
            "code": self.code(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Registration and login flows.
//!
//! Registration is three steps against the backing service, each with its own
//! failure policy:
//!
//! 1. identity + credential creation - failure is surfaced verbatim as
//!    `RegistrationRejected`; nothing was persisted, nothing to undo;
//! 2. profile row insert - failure leaves an identity without a profile.
//!    No automatic rollback is attempted (the auth service does not expose
//!    cheap idempotent deletion); the state is reported as
//!    `ProfilePersistFailure` and no token is issued;
//! 3. session issuance - failure leaves a usable account with no token,
//!    reported as `SessionIssueFailure`; a normal login recovers it.

use std::sync::Arc;

use sabor_core::{Email, UserId};

use crate::backend::{AuthApi, RowsApi};
use crate::error::ApiError;
use crate::models::Profile;

/// Table holding customer profiles.
const PROFILES_TABLE: &str = "profiles";

/// Raw registration input as received from the client.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Successful registration: a session token the client can use immediately.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub token: String,
    pub user_id: UserId,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
}

/// Registration and login orchestration.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthApi>,
    rows: Arc<dyn RowsApi>,
}

impl AccountService {
    /// Create the service around injected backend clients.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, rows: Arc<dyn RowsApi>) -> Self {
        Self { auth, rows }
    }

    /// Run the full registration flow.
    ///
    /// # Errors
    ///
    /// `Validation` before any external call; afterwards one of
    /// `RegistrationRejected`, `ProfilePersistFailure` or
    /// `SessionIssueFailure` depending on which step failed.
    pub async fn register(&self, input: RegisterInput) -> Result<RegistrationOutcome, ApiError> {
        let email = validate_register(&input)?;

        let user_id = self
            .auth
            .sign_up(email.as_str(), &input.password)
            .await
            .map_err(|err| ApiError::RegistrationRejected(err.upstream_message()))?;

        let profile = Profile {
            id: user_id.clone(),
            name: input.name,
            email: email.clone(),
            phone: None,
        };
        self.rows
            .insert(PROFILES_TABLE, profile.into_row())
            .await
            .map_err(ApiError::ProfilePersistFailure)?;

        let session = self
            .auth
            .sign_in(email.as_str(), &input.password)
            .await
            .map_err(ApiError::SessionIssueFailure)?;

        Ok(RegistrationOutcome {
            token: session.token,
            user_id,
        })
    }

    /// Exchange email + password for a session token.
    ///
    /// # Errors
    ///
    /// `Validation` if either field is missing; `InvalidCredential` if the
    /// auth service rejects the pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_owned(),
            ));
        }

        let session = self.auth.sign_in(email, password).await.map_err(|err| {
            tracing::debug!(error = %err, "login rejected by auth service");
            ApiError::InvalidCredential(err.upstream_message())
        })?;

        Ok(LoginOutcome {
            token: session.token,
        })
    }
}

/// Validate registration input; no external call is made when this fails.
fn validate_register(input: &RegisterInput) -> Result<Email, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_owned()));
    }
    if input.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_owned()));
    }
    Email::parse(input.email.trim())
        .map_err(|err| ApiError::Validation(format!("invalid email: {err}")))
}

//! Supabase-dialect client for the backing service.
//!
//! Speaks the GoTrue auth endpoints (`/auth/v1/*`) and the PostgREST rows
//! endpoints (`/rest/v1/{table}`) over plain `reqwest`. One long-lived client
//! is constructed at startup and injected into every flow; construction fails
//! fast if the HTTP client cannot be built, and every call carries a bounded
//! timeout so a hung upstream cannot hang a handler forever.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::debug;

use sabor_core::UserId;

use crate::config::SupabaseConfig;

use super::{AuthApi, AuthSession, BackendError, RowsApi, SelectQuery};
use async_trait::async_trait;

/// Per-call timeout. Hardening, not load-bearing: the upstream normally
/// answers in well under a second.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a Supabase-compatible auth + rows service.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                base_url: config.url.trim_end_matches('/').to_owned(),
                anon_key: config.anon_key.expose_secret().to_owned(),
            }),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    /// Read the response body, turning non-success statuses into
    /// [`BackendError::Api`] with a best-effort upstream message.
    async fn read_body(
        response: reqwest::Response,
        service: &'static str,
    ) -> Result<Value, BackendError> {
        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("unexpected status {status}"));
        debug!(service, status = status.as_u16(), %message, "backend call failed");
        Err(BackendError::Api {
            service,
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// GoTrue uses `msg`/`error_description`, PostgREST uses `message`.
fn extract_error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_owned)
}

/// Pull the identity out of a GoTrue user payload, which is either the user
/// object itself or an envelope with a `user` field.
fn extract_user_id(body: &Value) -> Result<UserId, BackendError> {
    body.get("id")
        .or_else(|| body.get("user").and_then(|user| user.get("id")))
        .and_then(Value::as_str)
        .map(UserId::new)
        .ok_or_else(|| BackendError::MalformedResponse("auth response without user id".to_owned()))
}

#[async_trait]
impl AuthApi for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, BackendError> {
        let response = self
            .inner
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.inner.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = Self::read_body(response, "auth").await?;
        extract_user_id(&body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .inner
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.inner.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = Self::read_body(response, "auth").await?;
        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BackendError::MalformedResponse("token response without access_token".to_owned())
            })?
            .to_owned();
        let user_id = extract_user_id(&body)?;

        Ok(AuthSession { token, user_id })
    }

    async fn resolve_token(&self, token: &str) -> Result<UserId, BackendError> {
        let response = self
            .inner
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let body = Self::read_body(response, "auth").await?;
        extract_user_id(&body)
    }
}

#[async_trait]
impl RowsApi for SupabaseClient {
    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        let response = self
            .inner
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let body = Self::read_body(response, "rest").await?;
        // PostgREST returns the representation as a one-element array.
        match body {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.swap_remove(0)),
            Value::Object(_) => Ok(body),
            _ => Err(BackendError::MalformedResponse(format!(
                "insert into {table} returned no representation"
            ))),
        }
    }

    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, BackendError> {
        let mut params: Vec<(String, String)> = query
            .filters
            .into_iter()
            .map(|(column, value)| (column, format!("eq.{value}")))
            .collect();
        if let Some((column, dir)) = query.order {
            params.push(("order".to_owned(), format!("{column}.{}", dir.as_str())));
        }

        let response = self
            .inner
            .http
            .get(self.rest_url(table))
            .query(&params)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .send()
            .await?;

        let body = Self::read_body(response, "rest").await?;
        match body {
            Value::Array(rows) => Ok(rows),
            _ => Err(BackendError::MalformedResponse(format!(
                "select from {table} did not return an array"
            ))),
        }
    }
}

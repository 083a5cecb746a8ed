//! Clients for the backing auth/persistence service.
//!
//! # Architecture
//!
//! The backend is an opaque external collaborator exposing two capabilities:
//! a credential-issuing auth API and a row-oriented persistence API with
//! filter/sort/insert primitives. The two seams are expressed as traits so
//! the flows depend on the capability, not the transport:
//!
//! - [`AuthApi`] - signup, password sign-in, token-to-identity exchange
//! - [`RowsApi`] - insert-returning-representation and filtered/sorted select
//!
//! [`supabase::SupabaseClient`] implements both against a live service
//! (GoTrue + PostgREST dialect); [`memory::InMemoryBackend`] implements both
//! in-process for tests, with call counters and injectable failures.
//!
//! No retries happen at this layer: every failure is surfaced immediately.

pub mod memory;
pub mod supabase;

pub use memory::InMemoryBackend;
pub use supabase::SupabaseClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use sabor_core::UserId;

/// Errors that can occur when talking to the backing service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Api {
        /// Which half of the service answered (`auth` or `rest`).
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Upstream error message, best-effort extracted from the body.
        message: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered 2xx but the body was not the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Message suitable for passing through to a client.
    ///
    /// Upstream auth messages are deliberately surfaced for register/login
    /// so clients can correct their input; everything else collapses to a
    /// generic phrase.
    #[must_use]
    pub fn upstream_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            _ => "the request could not be completed".to_owned(),
        }
    }
}

/// A session issued by the auth service after a successful sign-in.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Opaque bearer credential to be echoed on authenticated calls.
    pub token: String,
    /// Identity the token resolves to.
    pub user_id: UserId,
}

/// Credential-issuing auth API.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an identity + credential. Returns the new identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, BackendError>;

    /// Exchange email + password for a session token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    /// Exchange a bearer token for the identity it belongs to.
    async fn resolve_token(&self, token: &str) -> Result<UserId, BackendError>;
}

/// Sort direction for a [`SelectQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// Wire suffix understood by the rows API (`asc` / `desc`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A filtered, optionally sorted read against one table.
///
/// Only equality filters and a single order-by are modeled; that is all the
/// flows need, and it keeps the in-memory implementation honest.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    /// Column = value equality filters, all applied conjunctively.
    pub filters: Vec<(String, String)>,
    /// Optional (column, direction) ordering.
    pub order: Option<(String, SortDir)>,
}

impl SelectQuery {
    /// Start an unfiltered query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_owned(), value.into()));
        self
    }

    /// Set the ordering column and direction.
    #[must_use]
    pub fn order_by(mut self, column: &str, dir: SortDir) -> Self {
        self.order = Some((column.to_owned(), dir));
        self
    }
}

/// Row-oriented persistence API.
#[async_trait]
pub trait RowsApi: Send + Sync {
    /// Insert one row and return the stored representation (with generated
    /// key and timestamp).
    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError>;

    /// Read rows matching the query.
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, BackendError>;
}

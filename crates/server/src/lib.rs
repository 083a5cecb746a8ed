//! Sabor Server - order-taking API for the restaurant storefront.
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies throughout
//! - Opaque backing service for auth and row persistence, reached through
//!   the injected clients in [`backend`]
//! - Request-parallel, share-nothing: all per-request state is explicit
//!   handler arguments, all blocking work is awaited I/O
//!
//! The library form exists so the router can be exercised in-process by the
//! integration tests; the binary in `main.rs` only adds configuration,
//! telemetry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router around the given state.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

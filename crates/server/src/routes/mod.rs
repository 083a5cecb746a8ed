//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//!
//! # Auth (no gateway)
//! POST /api/auth/register   - Create account, profile and session
//! POST /api/auth/login      - Exchange credentials for a session token
//!
//! # Menu (no gateway)
//! GET  /api/menu            - Full menu grouped by category
//!
//! # Orders (credential gateway required)
//! POST /api/pedidos         - Record a cart checkout as a pending order
//! GET  /api/pedidos         - The caller's order history, newest first
//! POST /api/finalizar       - Record a checkout with delivery details
//! ```

pub mod auth;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/menu", get(menu::list))
        .route("/api/pedidos", post(orders::submit).get(orders::history))
        .route("/api/finalizar", post(orders::finalize))
}

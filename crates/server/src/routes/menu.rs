//! Menu handler.

use axum::{Json, extract::State, response::IntoResponse};

use crate::error::Result;
use crate::state::AppState;

/// GET /api/menu
///
/// No auth required; the full menu is returned on every call.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let grouped = state.menu().grouped().await?;
    Ok(Json(grouped))
}

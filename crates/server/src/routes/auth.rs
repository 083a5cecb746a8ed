//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::services::accounts::RegisterInput;
use crate::state::AppState;

/// Registration request body. Missing fields deserialize to empty strings
/// and are rejected by flow validation before any external call.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let outcome = state
        .accounts()
        .register(RegisterInput {
            email: payload.email,
            password: payload.password,
            name: payload.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Cadastro realizado com sucesso",
            "token": outcome.token,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let outcome = state
        .accounts()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({
        "message": "Login realizado com sucesso",
        "token": outcome.token,
    })))
}

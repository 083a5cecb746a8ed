//! Order handlers.
//!
//! All three handlers take [`CurrentUser`], so the credential gateway runs
//! before any body is even considered. Any `user_id` a client smuggles into
//! a payload is ignored: owner attribution comes only from the resolved
//! identity.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use sabor_core::CartLine;

use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::{NewFinalizedOrder, NewOrder};
use crate::state::AppState;

/// Cart checkout request body.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderPayload {
    #[serde(default)]
    pub items: Vec<CartLine>,
    pub total: Option<Decimal>,
    #[serde(default)]
    pub details: String,
}

/// Checkout-with-delivery-details request body.
#[derive(Debug, Deserialize)]
pub struct FinalizeOrderPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "payment_method")]
    pub payment: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<CartLine>,
    pub total: Option<Decimal>,
}

fn require_total(total: Option<Decimal>) -> Result<Decimal> {
    total.ok_or_else(|| ApiError::Validation("total is required".to_owned()))
}

/// POST /api/pedidos
pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SubmitOrderPayload>,
) -> Result<impl IntoResponse> {
    let order = NewOrder {
        items: payload.items,
        total: require_total(payload.total)?,
        details: payload.details,
    };
    let stored = state.orders().submit(&user, order).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Pedido registrado com sucesso",
            "order": stored,
        })),
    ))
}

/// POST /api/finalizar
pub async fn finalize(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<FinalizeOrderPayload>,
) -> Result<impl IntoResponse> {
    let order = NewFinalizedOrder {
        name: payload.name,
        phone: payload.phone,
        address: payload.address,
        payment_method: payload.payment,
        notes: payload.notes,
        items: payload.items,
        total: require_total(payload.total)?,
    };
    let stored = state.orders().finalize(&user, order).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Pedido finalizado com sucesso",
            "order": stored,
        })),
    ))
}

/// GET /api/pedidos
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let orders = state.orders().history(&user).await?;
    Ok(Json(orders))
}

//! End-to-end router tests against the in-memory backend.
//!
//! Every test drives the real router through `tower::ServiceExt::oneshot`,
//! so the credential gateway, JSON extraction, flow validation and error
//! mapping are all exercised exactly as in production. Only the backing
//! service is swapped for [`InMemoryBackend`].

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use sabor_server::backend::InMemoryBackend;
use sabor_server::config::{ServerConfig, SupabaseConfig};
use sabor_server::state::AppState;

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        supabase: SupabaseConfig {
            url: "http://localhost:54321".to_owned(),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn setup() -> (Router, InMemoryBackend) {
    let backend = InMemoryBackend::new();
    let state = AppState::new(
        test_config(),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
    );
    (sabor_server::app(state), backend)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers an account through the API and returns its session token.
async fn register(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": email, "password": "segredo123", "name": "Ana" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_owned()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let (app, _) = setup();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Registration and login
// =============================================================================

#[tokio::test]
async fn register_issues_usable_token_and_persists_profile() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    // The profile row landed with the registered fields.
    let profiles = backend.rows("profiles");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["email"], json!("ana@example.com"));
    assert_eq!(profiles[0]["name"], json!("Ana"));

    // The token passes the credential gateway.
    let response = app
        .oneshot(get_request("/api/pedidos", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn register_rejects_invalid_input_before_any_external_call() {
    let (app, backend) = setup();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": "not-an-email", "password": "segredo123", "name": "Ana" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("validation_error"));
    assert_eq!(backend.sign_up_calls(), 0);
    assert_eq!(backend.store_calls(), 0);
}

#[tokio::test]
async fn register_surfaces_duplicate_email_rejection() {
    let (app, backend) = setup();
    register(&app, "ana@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": "ana@example.com", "password": "outra-senha", "name": "Ana" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("registration_rejected"));
    // No second profile row was written.
    assert_eq!(backend.row_count("profiles"), 1);
}

#[tokio::test]
async fn register_reports_profile_persistence_failure_distinctly() {
    let (app, backend) = setup();
    backend.set_fail_insert("profiles");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": "ana@example.com", "password": "segredo123", "name": "Ana" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("profile_persist_failure"));
}

#[tokio::test]
async fn register_reports_session_issuance_failure_distinctly() {
    let (app, backend) = setup();
    backend.set_fail_sign_in(true);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "email": "ana@example.com", "password": "segredo123", "name": "Ana" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("session_issue_failure"));
    // The account and profile did get created; only the session step failed.
    assert_eq!(backend.row_count("profiles"), 1);
}

#[tokio::test]
async fn login_returns_token_for_registered_account() {
    let (app, _backend) = setup();
    register(&app, "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "ana@example.com", "password": "segredo123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap();

    let response = app
        .oneshot(get_request("/api/pedidos", Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_missing_fields_and_wrong_password() {
    let (app, _backend) = setup();
    register(&app, "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "ana@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], json!("validation_error"));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "ana@example.com", "password": "errada" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("invalid_credential"));
    // The auth service's own rejection message reaches the client.
    assert_eq!(body["error"], json!("Invalid login credentials"));
}

// =============================================================================
// Credential gateway
// =============================================================================

#[tokio::test]
async fn missing_credential_is_rejected_without_touching_the_store() {
    let (app, backend) = setup();

    let response = app
        .oneshot(get_request("/api/pedidos", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("unauthenticated"));
    assert_eq!(backend.resolve_calls(), 0);
    assert_eq!(backend.store_calls(), 0);
}

#[tokio::test]
async fn unverifiable_credential_is_rejected_without_touching_the_store() {
    let (app, backend) = setup();

    let response = app
        .oneshot(get_request("/api/pedidos", Some("tok-forged")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("invalid_credential"));
    assert_eq!(backend.resolve_calls(), 1);
    assert_eq!(backend.store_calls(), 0);
}

#[tokio::test]
async fn non_bearer_scheme_is_treated_as_missing_credential() {
    let (app, backend) = setup();

    let request = Request::builder()
        .method("GET")
        .uri("/api/pedidos")
        .header(header::AUTHORIZATION, "Basic YWJjOjEyMw==")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], json!("unauthenticated"));
    assert_eq!(backend.resolve_calls(), 0);
}

// =============================================================================
// Order submission
// =============================================================================

fn cart_payload() -> Value {
    json!({
        "items": [
            { "item_id": 1, "quantity": 2, "unit_price": "5.00" }
        ],
        "total": "10.00",
        "details": "sem cebola",
    })
}

#[tokio::test]
async fn submit_order_persists_owner_status_and_echoes_the_record() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &cart_payload(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("Pedido registrado com sucesso"));

    let order = &body["order"];
    assert_eq!(order["status"], json!("pendente"));
    assert_eq!(order["total"], json!("10.00"));
    assert_eq!(order["details"], json!("sem cebola"));
    assert_eq!(
        order["items"],
        json!([{ "item_id": 1, "quantity": 2, "unit_price": "5.00" }])
    );
    assert!(order["id"].is_number());
    assert!(order["created_at"].is_string());

    // The stored row is attributed to the registered identity.
    let rows = backend.rows("orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], order["user_id"]);

    // And the history round-trips the exact same record.
    let response = app
        .oneshot(get_request("/api/pedidos", Some(&token)))
        .await
        .unwrap();
    let history = body_json(response).await;
    assert_eq!(history, json!([order.clone()]));
}

#[tokio::test]
async fn submit_order_ignores_spoofed_owner_in_payload() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let mut payload = cart_payload();
    payload["user_id"] = json!("someone-else");

    let response = app
        .oneshot(json_request("POST", "/api/pedidos", Some(&token), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let rows = backend.rows("orders");
    assert_ne!(rows[0]["user_id"], json!("someone-else"));
}

#[tokio::test]
async fn submit_order_rejects_empty_cart_without_persisting() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;
    let inserts_before = backend.insert_calls();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &json!({ "items": [], "total": "10.00", "details": "x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], json!("validation_error"));
    assert_eq!(backend.insert_calls(), inserts_before);
    assert_eq!(backend.row_count("orders"), 0);
}

#[tokio::test]
async fn submit_order_requires_total_and_details() {
    let (app, _backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let mut missing_total = cart_payload();
    missing_total.as_object_mut().unwrap().remove("total");
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &missing_total,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut missing_details = cart_payload();
    missing_details["details"] = json!("");
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &missing_details,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_order_maps_store_failure_to_persistence_error() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;
    backend.set_fail_insert("orders");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &cart_payload(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["code"],
        json!("persistence_error")
    );
}

// =============================================================================
// Order history
// =============================================================================

#[tokio::test]
async fn history_is_owner_scoped_and_newest_first() {
    let (app, _backend) = setup();
    let ana = register(&app, "ana@example.com").await;
    let beto = register(&app, "beto@example.com").await;

    for details in ["primeiro", "segundo"] {
        let mut payload = cart_payload();
        payload["details"] = json!(details);
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/pedidos", Some(&ana), &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&beto),
            &cart_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request("/api/pedidos", Some(&ana)))
        .await
        .unwrap();
    let history = body_json(response).await;
    let history = history.as_array().unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["details"], json!("segundo"));
    assert_eq!(history[1]["details"], json!("primeiro"));

    let response = app
        .oneshot(get_request("/api/pedidos", Some(&beto)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn history_fails_whole_request_on_corrupt_row() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pedidos",
            Some(&token),
            &cart_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let user_id = body["order"]["user_id"].clone();

    // A row whose items text is not valid JSON.
    backend.push_row(
        "orders",
        json!({
            "id": 999,
            "user_id": user_id,
            "items": "{not json",
            "total": "10.00",
            "status": "pendente",
            "details": "x",
            "created_at": "2026-08-01T12:00:00Z",
        }),
    );

    let response = app
        .oneshot(get_request("/api/pedidos", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["code"],
        json!("data_integrity_error")
    );
}

// =============================================================================
// Finalization
// =============================================================================

fn finalize_payload() -> Value {
    json!({
        "name": "Ana",
        "phone": "11 99999-0000",
        "address": "Rua A, 1",
        "payment": "pix",
        "notes": "troco para 50",
        "items": [
            { "item_id": 2, "quantity": 1, "unit_price": "25.50" }
        ],
        "total": "25.50",
    })
}

#[tokio::test]
async fn finalize_persists_delivery_details() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/finalizar",
            Some(&token),
            &finalize_payload(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("Pedido finalizado com sucesso"));
    assert_eq!(body["order"]["address"], json!("Rua A, 1"));
    assert_eq!(body["order"]["payment_method"], json!("pix"));
    assert_eq!(body["order"]["notes"], json!("troco para 50"));

    let rows = backend.rows("finalized_orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["phone"], json!("11 99999-0000"));
}

#[tokio::test]
async fn finalize_rejects_missing_delivery_fields() {
    let (app, backend) = setup();
    let token = register(&app, "ana@example.com").await;

    let mut payload = finalize_payload();
    payload["address"] = json!("");
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/finalizar",
            Some(&token),
            &payload,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], json!("validation_error"));
    assert_eq!(backend.row_count("finalized_orders"), 0);
}

#[tokio::test]
async fn finalize_requires_authentication() {
    let (app, _backend) = setup();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/finalizar",
            None,
            &finalize_payload(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Menu
// =============================================================================

fn seed_menu(backend: &InMemoryBackend) {
    let rows = [
        json!({ "id": 1, "name": "Suco de laranja", "description": "300ml",
                "price": "8.00", "category": "Bebidas", "image_url": null }),
        json!({ "id": 2, "name": "Pastel de queijo", "description": "",
                "price": "6.50", "category": null, "image_url": null }),
        json!({ "id": 3, "name": "Refrigerante", "description": "lata",
                "price": "5.00", "category": "Bebidas", "image_url": "http://cdn/ref.png" }),
    ];
    for row in rows {
        backend.push_row("menu_items", row);
    }
}

#[tokio::test]
async fn menu_is_public_and_grouped_by_category() {
    let (app, backend) = setup();
    seed_menu(&backend);

    let response = app.oneshot(get_request("/api/menu", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let groups = body.as_object().unwrap();
    assert_eq!(groups.len(), 2);

    let bebidas = body["Bebidas"].as_array().unwrap();
    assert_eq!(bebidas.len(), 2);
    assert_eq!(bebidas[0]["id"], json!(1));
    assert_eq!(bebidas[1]["id"], json!(3));

    // Uncategorized items land in the sentinel bucket.
    let outros = body["Outros"].as_array().unwrap();
    assert_eq!(outros.len(), 1);
    assert_eq!(outros[0]["name"], json!("Pastel de queijo"));
}

#[tokio::test]
async fn menu_surfaces_store_failure_as_persistence_error() {
    let (app, backend) = setup();
    backend.set_fail_select("menu_items");

    let response = app.oneshot(get_request("/api/menu", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["code"],
        json!("persistence_error")
    );
}

#[tokio::test]
async fn empty_menu_returns_empty_object() {
    let (app, _backend) = setup();

    let response = app.oneshot(get_request("/api/menu", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}

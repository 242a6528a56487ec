//! Security tests for abuddy-api
//!
//! Tests security-critical features:
//! - Bearer token handling in the optional-auth middleware
//! - Ownership scoping of appliances and their children
//! - 10MB request body limit
//! - CORS restricted to the configured frontend origins

use std::sync::Arc;

use abuddy_api::identity::{Identity, IdentityError, IdentityProvider, StaticIdentityProvider};
use abuddy_api::{build_router, AppState};
use abuddy_common::db::init_memory_database;
use abuddy_common::WarrantyPolicy;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

const OWNER_TOKEN: &str = "token-owner";
const INTRUDER_TOKEN: &str = "token-intruder";

/// Test helper: App with two users and the default frontend origin
async fn setup_app() -> axum::Router {
    let db = init_memory_database()
        .await
        .expect("Should create in-memory database");
    let identity = StaticIdentityProvider::new()
        .with_token(OWNER_TOKEN, Identity::new("owner", "owner@example.com"))
        .with_token(INTRUDER_TOKEN, Identity::new("intruder", "intruder@example.com"));

    let state = AppState::new(db, Arc::new(identity), WarrantyPolicy::default())
        .with_frontend_urls(vec!["https://app.example.com".to_string()]);
    build_router(state)
}

fn request(method: &str, uri: &str, authorization: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create_owned_appliance(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/appliances",
            Some(&format!("Bearer {}", OWNER_TOKEN)),
            Some(json!({
                "name": "Fridge",
                "brand": "Samsung",
                "model": "RF28R7351SG",
                "purchaseDate": "2024-01-15",
                "warrantyDurationMonths": 24
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Token handling
// =============================================================================

#[tokio::test]
async fn test_invalid_token_rejected_even_on_public_reads() {
    let app = setup_app().await;

    let (status, body) = send(&app, request("GET", "/api/appliances", Some("Bearer forged"), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_non_bearer_header_is_anonymous() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        request("GET", "/api/appliances", Some("Basic dXNlcjpwYXNz"), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_health_ignores_bad_token() {
    let app = setup_app().await;

    let (status, _) = send(&app, request("GET", "/health", Some("Bearer forged"), None)).await;

    assert_eq!(status, StatusCode::OK);
}

struct UnavailableProvider;

#[async_trait]
impl IdentityProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn verify(&self, _token: &str) -> Result<Option<Identity>, IdentityError> {
        Err(IdentityError::UnexpectedStatus(503))
    }
}

#[tokio::test]
async fn test_identity_outage_is_bad_gateway() {
    let db = init_memory_database().await.unwrap();
    let app = build_router(AppState::new(db, Arc::new(UnavailableProvider), WarrantyPolicy::default()));

    let (status, body) = send(&app, request("GET", "/api/auth/me", Some("Bearer anything"), None)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Identity service unavailable");
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn test_other_user_cannot_modify_appliance() {
    let app = setup_app().await;
    let id = create_owned_appliance(&app).await;
    let intruder = format!("Bearer {}", INTRUDER_TOKEN);
    let url = format!("/api/appliances/{}", id);

    let (status, _) = send(&app, request("PUT", &url, Some(&intruder), Some(json!({ "name": "Mine now" })))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", &url, Some(&intruder), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("{}/documents", url),
            Some(&intruder),
            Some(json!({ "title": "Phishing", "url": "https://example.com/x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Appliance not found");

    // Still intact for the owner
    let (status, body) = send(&app, request("GET", &url, Some(&format!("Bearer {}", OWNER_TOKEN)), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Fridge");
}

#[tokio::test]
async fn test_child_lookup_scoped_to_parent() {
    let app = setup_app().await;
    let owner = format!("Bearer {}", OWNER_TOKEN);
    let first = create_owned_appliance(&app).await;
    let second = create_owned_appliance(&app).await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/appliances/{}/contacts", first),
            Some(&owner),
            Some(json!({ "name": "Support" })),
        ),
    )
    .await;
    let contact_id = body["data"]["id"].as_str().unwrap().to_string();

    // Same contact id through the wrong parent
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/appliances/{}/contacts/{}", second, contact_id),
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Support contact not found");
}

// =============================================================================
// Request body handling
// =============================================================================

/// Bodies over 10MB are rejected before deserialization
#[tokio::test]
async fn test_body_size_limit_10mb() {
    let app = setup_app().await;

    // Create a body slightly larger than 10MB
    let large_body_size = 10 * 1024 * 1024 + 1024; // 10MB + 1KB
    let large_body = vec![b'x'; large_body_size];

    let request = Request::builder()
        .method("POST")
        .uri("/api/appliances")
        .header("authorization", format!("Bearer {}", OWNER_TOKEN))
        .header("content-type", "application/json")
        .body(Body::from(large_body))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], "Request body too large");
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/appliances")
        .header("authorization", format!("Bearer {}", OWNER_TOKEN))
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn test_invalid_date_is_validation_error() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/appliances",
            Some(&format!("Bearer {}", OWNER_TOKEN)),
            Some(json!({
                "name": "Fridge",
                "brand": "Samsung",
                "model": "X",
                "purchaseDate": "2024-02-30",
                "warrantyDurationMonths": 12
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let app = setup_app().await;

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/appliances")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(preflight("https://app.example.com")).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "https://app.example.com"
    );
    assert_eq!(
        response.headers().get("access-control-allow-credentials").unwrap(),
        "true"
    );

    let response = app.clone().oneshot(preflight("https://evil.example.com")).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

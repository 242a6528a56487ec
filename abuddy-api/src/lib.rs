//! abuddy-api library - Appliance Buddy REST service
//!
//! Appliances with their warranties, support contacts, maintenance tasks and
//! linked documents, scoped to the authenticated user.

use std::sync::Arc;

use abuddy_common::config::DEFAULT_FRONTEND_URL;
use abuddy_common::WarrantyPolicy;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod db;
pub mod identity;
pub mod pagination;

use identity::IdentityProvider;

/// Request bodies above this size are rejected with 413
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolves bearer tokens to users
    pub identity: Arc<dyn IdentityProvider>,
    /// Warranty classification tunables
    pub policy: WarrantyPolicy,
    /// Origins allowed by CORS
    pub frontend_urls: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, identity: Arc<dyn IdentityProvider>, policy: WarrantyPolicy) -> Self {
        Self {
            db,
            identity,
            policy,
            frontend_urls: Arc::new(vec![DEFAULT_FRONTEND_URL.to_string()]),
        }
    }

    pub fn with_frontend_urls(mut self, urls: Vec<String>) -> Self {
        self.frontend_urls = Arc::new(urls);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Optional authentication on everything under /api
    let protected = Router::new()
        .route(
            "/api/appliances",
            get(api::appliances::list_appliances).post(api::appliances::create_appliance),
        )
        .route("/api/appliances/summary", get(api::appliances::appliance_summary))
        .route(
            "/api/appliances/:id",
            get(api::appliances::get_appliance)
                .put(api::appliances::update_appliance)
                .delete(api::appliances::delete_appliance),
        )
        .route(
            "/api/appliances/:id/maintenance",
            get(api::maintenance::list_tasks).post(api::maintenance::create_task),
        )
        .route(
            "/api/appliances/:id/maintenance/:task_id",
            get(api::maintenance::get_task)
                .put(api::maintenance::update_task)
                .delete(api::maintenance::delete_task),
        )
        .route(
            "/api/appliances/:id/contacts",
            get(api::contacts::list_contacts).post(api::contacts::create_contact),
        )
        .route(
            "/api/appliances/:id/contacts/:contact_id",
            get(api::contacts::get_contact)
                .put(api::contacts::update_contact)
                .delete(api::contacts::delete_contact),
        )
        .route(
            "/api/appliances/:id/documents",
            get(api::documents::list_documents).post(api::documents::create_document),
        )
        .route(
            "/api/appliances/:id/documents/:document_id",
            get(api::documents::get_document)
                .put(api::documents::update_document)
                .delete(api::documents::delete_document),
        )
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/reset-sample-data", post(api::auth::reset_sample_data))
        .route(
            "/api/auth/confirm-reset-sample-data",
            post(api::auth::confirm_reset_sample_data),
        )
        .layer(middleware::from_fn_with_state(state.clone(), api::optional_auth));

    // Public routes (no authentication)
    let public = api::health_routes();

    let cors = cors_layer(&state.frontend_urls);

    Router::new()
        .merge(protected)
        .merge(public)
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured frontend origins; unparseable entries are skipped
fn cors_layer(frontend_urls: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = frontend_urls
        .iter()
        .filter_map(|url| match HeaderValue::from_str(url.trim_end_matches('/')) {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!("Ignoring invalid frontend origin: {}", url);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

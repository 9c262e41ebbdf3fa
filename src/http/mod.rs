//! HTTP REST adapter
//!
//! Depends only on core/ and clients/. Provides the axum router,
//! request handlers, middleware, and error-to-status mapping.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use handlers::*;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::config::Config;
use crate::core::services::Services;

/// Build the API router
pub fn router(services: Arc<Services>) -> Router {
    let max_upload = services.config.limits.max_upload_bytes;
    let cors = cors_layer(&services.config);

    Router::new()
        // Health check endpoint
        .route("/health", get(health_handler))
        // API endpoints
        .route(
            "/api/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/api/ask/:doc_id", post(ask_handler))
        .route("/api/summarize/:doc_id", post(summarize_handler))
        .route("/api/documents", get(list_documents_handler))
        .route(
            "/api/documents/:doc_id",
            get(get_document_handler).delete(delete_document_handler),
        )
        // Add middleware
        .layer(from_fn(middleware::log_request))
        .layer(from_fn(middleware::security_headers))
        .layer(cors)
        // Add shared state
        .with_state(services)
}

/// CORS policy: permissive unless an origin allowlist is configured
fn cors_layer(config: &Config) -> CorsLayer {
    if config.server.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

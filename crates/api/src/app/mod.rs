//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store selection + order-service construction (DI root)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    let services = Arc::new(services::build_services().await);
    build_app_with_services(services)
}

/// Router over pre-built services (tests inject an in-memory store here).
pub fn build_app_with_services(services: Arc<services::AppServices>) -> Router {
    let scoped = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_context))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(scoped)
}

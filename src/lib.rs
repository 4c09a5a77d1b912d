//! Mollie Components storefront endpoints
//!
//! Serves the Mollie Components credit card script and stylesheet for a
//! storefront and stores tokenized card references against customers.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod context;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod services;
pub mod tracing;

use axum::Router;
use tower_http::compression::CompressionLayer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(services: handlers::AppServices) -> Self {
        Self { services }
    }
}

/// Builds the application router with its middleware stack.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::health_routes())
        .merge(handlers::components::components_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

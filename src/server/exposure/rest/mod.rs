//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the health
//! routes, every registered entity's CRUD routes and any custom routes.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let entity_routes = host.entity_registry.build_routes();

        custom_routes
            .into_iter()
            .fold(Self::health_routes().merge(entity_routes), |app, custom| {
                app.merge(custom)
            })
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME")
        }))
    }
}

//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use super::host::{ModuleInfo, ServerHost};
use crate::config::ServiceConfig;
use crate::core::module::{Module, ServiceContext};
use crate::core::relationship::{RelationshipRegistry, RelationshipValidator};
use anyhow::{Result, bail};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_service_config(config.service)
///     .register_module(InvoicingModule::in_memory())?
///     .build()?;
/// ```
pub struct ServerBuilder {
    service_config: ServiceConfig,
    modules: Vec<Arc<dyn Module>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            service_config: ServiceConfig::default(),
            modules: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Settings applied to every entity service
    pub fn with_service_config(mut self, config: ServiceConfig) -> Self {
        self.service_config = config;
        self
    }

    /// Add routes that don't fit the CRUD pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a module
    ///
    /// Fails if one of its entity types is already owned by another module.
    pub fn register_module(mut self, module: impl Module + 'static) -> Result<Self> {
        for existing in &self.modules {
            for entity_type in module.entity_types() {
                if existing.entity_types().contains(&entity_type) {
                    bail!(
                        "Entity type '{}' of module '{}' is already registered by module '{}'",
                        entity_type,
                        module.name(),
                        existing.name()
                    );
                }
            }
        }

        tracing::info!(
            module = module.name(),
            version = module.version(),
            entities = ?module.entity_types(),
            "registered module"
        );
        self.modules.push(Arc::new(module));
        Ok(self)
    }

    /// Build the host
    ///
    /// Relationships from every module are collected first, so each entity
    /// service is guarded by the complete relationship table.
    pub fn build_host(self) -> Result<ServerHost> {
        let mut relationships = RelationshipRegistry::new();
        for module in &self.modules {
            module.declare_relationships(&mut relationships);
        }
        tracing::debug!(registry = ?relationships, "relationship registry built");

        let validator = RelationshipValidator::new(Arc::new(relationships));
        let context = ServiceContext::new(validator.clone(), self.service_config);

        let mut entity_registry = EntityRegistry::new();
        for module in &self.modules {
            module.register_entities(&mut entity_registry, &context);
        }

        for entity_type in entity_registry.entity_types() {
            if !validator.registry().contains(entity_type) {
                bail!(
                    "Entity type '{}' is exposed but was never registered for relationship checks",
                    entity_type
                );
            }
        }

        let modules = self
            .modules
            .iter()
            .map(|module| ModuleInfo {
                name: module.name().to_string(),
                version: module.version().to_string(),
            })
            .collect();

        Ok(ServerHost {
            entity_registry,
            validator,
            service_config: self.service_config,
            modules,
        })
    }

    /// Build the final REST router
    ///
    /// Health routes, CRUD routes for all registered entities and custom
    /// routes, wrapped in request tracing and a permissive CORS policy.
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);

        Ok(RestExposure::build_router(host, custom_routes)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or SIGTERM; never resolves if no handler can be installed
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

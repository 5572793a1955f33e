//! Entity registry for managing entity descriptors and building their routes

use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "invoice")
    fn entity_type(&self) -> &str;

    /// The plural resource name (e.g., "invoices")
    fn plural(&self) -> &str;

    /// Build the routes for this entity
    ///
    /// Should return a Router with routes like:
    /// - POST /api/{plural}
    /// - PUT /api/{plural}
    /// - GET /api/{plural}/{id}
    /// - DELETE /api/{plural}/{id}
    fn build_routes(&self) -> Router;
}

/// Registry for all entities exposed over HTTP
///
/// This registry collects entity descriptors from all registered modules
/// and can generate a router with all of their routes.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is the key; registering it again replaces the
    /// previous descriptor.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        tracing::debug!(
            entity_type = %entity_type,
            plural = descriptor.plural(),
            "registered entity descriptor"
        );
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Get all registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}

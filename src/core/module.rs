//! Module system
//!
//! A module groups entity types together with their relationships and
//! their HTTP descriptors. The server builder collects relationships from
//! every module before any descriptor is created, so each service sees the
//! complete relationship table.

use crate::config::ServiceConfig;
use crate::core::entity::Entity;
use crate::core::relationship::{RelationshipRegistry, RelationshipValidator};
use crate::core::repository::Repository;
use crate::core::service::EntityService;
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

/// Shared state handed to modules when they register their entities
#[derive(Clone, Debug)]
pub struct ServiceContext {
    pub validator: RelationshipValidator,
    pub config: ServiceConfig,
}

impl ServiceContext {
    pub fn new(validator: RelationshipValidator, config: ServiceConfig) -> Self {
        Self { validator, config }
    }

    /// Build a service for `T` wired to the shared validator and settings
    pub fn service<T: Entity>(&self, repository: Arc<dyn Repository<T>>) -> EntityService<T> {
        EntityService::new(repository, self.validator.clone())
            .with_already_deleted_policy(self.config.already_deleted)
    }
}

/// Trait for an application module
pub trait Module: Send + Sync {
    /// Unique module name
    fn name(&self) -> &str;

    /// Module version
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// List of entity types managed by this module
    fn entity_types(&self) -> Vec<&str>;

    /// Declare the foreign keys of this module's entity types
    fn declare_relationships(&self, registry: &mut RelationshipRegistry);

    /// Register entity descriptors with the entity registry
    ///
    /// Called after every module has declared its relationships.
    fn register_entities(&self, registry: &mut EntityRegistry, context: &ServiceContext);
}

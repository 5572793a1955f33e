//! Server host holding the assembled application state
//!
//! The host is what the builder produces once every module has declared its
//! relationships and registered its entities. Exposures consume it to build
//! their routers.

use crate::config::ServiceConfig;
use crate::core::relationship::RelationshipValidator;
use crate::server::entity_registry::EntityRegistry;

/// Name and version of a registered module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub version: String,
}

/// Host context containing all assembled state
pub struct ServerHost {
    /// Entity registry for CRUD routes
    pub entity_registry: EntityRegistry,

    /// Delete guard shared by every entity service
    pub validator: RelationshipValidator,

    /// Settings the services were built with
    pub service_config: ServiceConfig,

    /// Modules in registration order
    pub modules: Vec<ModuleInfo>,
}

impl ServerHost {
    /// Get entity types exposed by the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    /// Whether the host exposes at least one entity type
    pub fn is_ready(&self) -> bool {
        !self.entity_registry.entity_types().is_empty()
    }
}

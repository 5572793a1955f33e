//! Server module for building HTTP servers with auto-registered routes
//!
//! The `ServerBuilder` collects modules, builds the shared relationship
//! registry from their declarations, then mounts every entity's CRUD routes
//! together with the health routes.

pub mod builder;
pub mod descriptor;
pub mod entity_registry;
pub mod exposure;
pub mod handlers;
pub mod host;

pub use builder::ServerBuilder;
pub use descriptor::CrudDescriptor;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use handlers::ApiResponse;
pub use host::{ModuleInfo, ServerHost};

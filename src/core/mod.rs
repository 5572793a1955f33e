//! Core module containing fundamental traits and types for the framework

pub mod entity;
pub mod error;
pub mod module;
pub mod relationship;
pub mod repository;
pub mod service;

pub use entity::{Entity, EntityId};
pub use error::{
    ConfigError, EntityError, InvoicingError, InvoicingResult, RequestError, StorageError,
};
pub use module::{Module, ServiceContext};
pub use relationship::{DependencyCheck, RelationshipRegistry, RelationshipValidator};
pub use repository::{ForeignKey, Repository};
pub use service::{AlreadyDeletedPolicy, EntityService, UpdateOptions};

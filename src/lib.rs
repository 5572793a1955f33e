//! # invoicing
//!
//! A generic CRUD backend for invoices and invoice line-items, built around
//! a relationship-guarded soft delete.
//!
//! ## Features
//!
//! - **Audit lifecycle**: every entity carries `id`, `state`, `created_at`
//!   and `deleted_at`, managed by the service layer
//! - **Guarded soft delete**: a record cannot be deleted while an active
//!   record of any registered type references it
//! - **Explicit relationships**: foreign keys are declared per module at
//!   startup, with typed accessors
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the
//!   `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoicing::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .register_module(InvoicingModule::in_memory())?
//!     .build()?;
//!
//! // DELETE /api/invoices/1 answers 409 while an active line references it
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod logging;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Entity, EntityId},
        error::{
            ConfigError, EntityError, InvoicingError, InvoicingResult, RequestError, StorageError,
        },
        module::{Module, ServiceContext},
        relationship::{RelationshipRegistry, RelationshipValidator},
        repository::{ForeignKey, Repository},
        service::{AlreadyDeletedPolicy, EntityService, UpdateOptions},
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Entities ===
    pub use crate::entities::{Invoice, InvoiceLine, InvoicingModule};

    // === Storage ===
    pub use crate::storage::InMemoryRepository;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresRepository;

    // === Config ===
    pub use crate::config::{AppConfig, LogFormat, ServiceConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{
        ApiResponse, CrudDescriptor, EntityDescriptor, EntityRegistry, ServerBuilder,
    };

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}

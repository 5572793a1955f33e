//! Typed error handling for the invoicing backend
//!
//! Callers can tell apart the three outcomes of a failed delete
//! (record missing, record still referenced, store failure) without
//! inspecting strings.
//!
//! # Error Categories
//!
//! - [`EntityError`]: Errors related to entity operations (CRUD, guarded delete)
//! - [`StorageError`]: Errors raised by a repository backend
//! - [`ConfigError`]: Errors related to configuration loading and validation,
//!   returned by [`AppConfig`](crate::config::AppConfig) on its own
//! - [`RequestError`]: Errors related to malformed HTTP input
//!
//! # Example
//!
//! ```rust,ignore
//! match service.delete(id).await {
//!     Ok(id) => println!("deleted {}", id),
//!     Err(InvoicingError::Entity(EntityError::HasDependents { .. })) => {
//!         println!("still referenced");
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::entity::EntityId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the invoicing backend
#[derive(Debug, Error)]
pub enum InvoicingError {
    /// Entity-related errors (CRUD operations)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InvoicingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoicingError::Entity(e) => e.status_code(),
            InvoicingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoicingError::Request(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoicingError::Entity(e) => e.error_code(),
            InvoicingError::Storage(_) => "STORAGE_ERROR",
            InvoicingError::Request(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InvoicingError::Entity(EntityError::NotFound { entity_type, id })
            | InvoicingError::Entity(EntityError::HasDependents { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for InvoicingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// No record with this id exists (or it is already deleted, depending on policy)
    #[error("{entity_type} with id '{id}' not found")]
    NotFound {
        entity_type: String,
        id: EntityId,
    },

    /// Active records still reference this one; nothing was modified
    #[error(
        "{entity_type} with id '{id}' cannot be deleted: it is still referenced by active records"
    )]
    HasDependents {
        entity_type: String,
        id: EntityId,
    },

    /// Entity type is not registered
    #[error("Unknown entity type: {entity_type}")]
    UnknownType { entity_type: String },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: EntityId) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::HasDependents { .. } => StatusCode::CONFLICT,
            EntityError::UnknownType { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::HasDependents { .. } => "ENTITY_HAS_DEPENDENTS",
            EntityError::UnknownType { .. } => "UNKNOWN_ENTITY_TYPE",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
///
/// These are never retried by the service layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// A stored row could not be mapped to or from its entity type
    #[error("Failed to serialize/deserialize {entity_type}: {message}")]
    Serialization {
        entity_type: String,
        message: String,
    },

    /// Backend not available
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

impl StorageError {
    pub fn query(backend: &str, message: impl Into<String>) -> Self {
        StorageError::QueryError {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to parse configuration
    #[error(
        "Failed to parse configuration{}: {}",
        .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default(),
        .message
    )]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A field holds a value the application cannot use
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// I/O error while reading configuration
    #[error("Configuration I/O error: {message}")]
    IoError { message: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid entity ID format
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for InvoicingError {
    fn from(err: serde_json::Error) -> Self {
        InvoicingError::Request(RequestError::InvalidBody {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for invoicing operations
pub type InvoicingResult<T> = Result<T, InvoicingError>;

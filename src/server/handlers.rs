//! Generic HTTP handlers shared by every entity type
//!
//! Handlers are thin: they parse the request, call [`EntityService`] and
//! map the outcome to a response. Failures are rendered by
//! [`InvoicingError`]'s `IntoResponse` implementation.

use crate::core::entity::{Entity, EntityId};
use crate::core::error::{InvoicingError, InvoicingResult, RequestError};
use crate::core::service::{EntityService, UpdateOptions};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use serde_json::Value;

pub const STORED_MESSAGE: &str = "Record stored successfully";
pub const UPDATED_MESSAGE: &str = "Record updated successfully";
pub const DELETED_MESSAGE: &str = "Record successfully deleted";

/// Envelope returned by the mutating endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<C> {
    pub content: Option<C>,
    pub is_successful: bool,
    pub message: String,
}

impl<C> ApiResponse<C> {
    pub fn success(content: C, message: impl Into<String>) -> Self {
        Self {
            content: Some(content),
            is_successful: true,
            message: message.into(),
        }
    }
}

fn parse_id(raw: &str) -> InvoicingResult<EntityId> {
    raw.parse().map_err(|_| {
        InvoicingError::from(RequestError::InvalidEntityId {
            id: raw.to_string(),
        })
    })
}

pub async fn get_entity<T: Entity>(
    State(service): State<EntityService<T>>,
    Path(id): Path<String>,
) -> InvoicingResult<Json<T>> {
    let id = parse_id(&id)?;
    service.get_required(id).await.map(Json)
}

pub async fn create_entity<T: Entity>(
    State(service): State<EntityService<T>>,
    Json(entity): Json<T>,
) -> InvoicingResult<(StatusCode, Json<ApiResponse<T>>)> {
    let created = service.create(entity).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created, STORED_MESSAGE)),
    ))
}

/// Replace a record; `state` and `deleted_at` keep their stored values
/// unless the body sets them
pub async fn update_entity<T: Entity>(
    State(service): State<EntityService<T>>,
    Json(payload): Json<Value>,
) -> InvoicingResult<Json<ApiResponse<T>>> {
    let options = UpdateOptions {
        overwrite_state: payload.get("state").is_some(),
        overwrite_deleted_at: payload.get("deleted_at").is_some(),
    };
    let entity: T = serde_json::from_value(payload)?;

    let updated = service.update_with(entity, options).await?;
    Ok(Json(ApiResponse::success(updated, UPDATED_MESSAGE)))
}

pub async fn delete_entity<T: Entity>(
    State(service): State<EntityService<T>>,
    Path(id): Path<String>,
) -> InvoicingResult<Json<ApiResponse<EntityId>>> {
    let id = parse_id(&id)?;
    let deleted = service.delete(id).await?;
    Ok(Json(ApiResponse::success(deleted, DELETED_MESSAGE)))
}

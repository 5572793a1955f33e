//! Generic entity service: audit lifecycle and relationship-guarded soft delete

use crate::core::entity::{Entity, EntityId};
use crate::core::error::{EntityError, InvoicingResult};
use crate::core::relationship::RelationshipValidator;
use crate::core::repository::Repository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What deleting a record that is already soft-deleted does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlreadyDeletedPolicy {
    /// Report the record as not found; `deleted_at` keeps its first value
    #[default]
    NotFound,
    /// Delete again, overwriting `deleted_at`
    Restamp,
}

/// Which lifecycle fields of an incoming update replace the stored ones
///
/// `created_at` is never replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    pub overwrite_state: bool,
    pub overwrite_deleted_at: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            overwrite_state: true,
            overwrite_deleted_at: true,
        }
    }
}

/// Create / read / update / soft-delete for one entity type
pub struct EntityService<T: Entity> {
    repository: Arc<dyn Repository<T>>,
    validator: RelationshipValidator,
    already_deleted: AlreadyDeletedPolicy,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Entity> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            validator: self.validator.clone(),
            already_deleted: self.already_deleted,
            clock: self.clock,
        }
    }
}

impl<T: Entity> EntityService<T> {
    pub fn new(repository: Arc<dyn Repository<T>>, validator: RelationshipValidator) -> Self {
        Self {
            repository,
            validator,
            already_deleted: AlreadyDeletedPolicy::default(),
            clock: Utc::now,
        }
    }

    pub fn with_already_deleted_policy(mut self, policy: AlreadyDeletedPolicy) -> Self {
        self.already_deleted = policy;
        self
    }

    /// Replace the time source used for `created_at` / `deleted_at`
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Get a record by id, active or not
    pub async fn get(&self, id: EntityId) -> InvoicingResult<Option<T>> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Get a record by id, failing with `NotFound` when absent
    pub async fn get_required(&self, id: EntityId) -> InvoicingResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| EntityError::not_found(T::entity_type(), id).into())
    }

    /// Persist a new record
    ///
    /// Audit fields supplied by the caller are discarded: the record starts
    /// active with `created_at = now` and the store assigns its id.
    pub async fn create(&self, mut entity: T) -> InvoicingResult<T> {
        entity.set_id(0);
        entity.mark_created((self.clock)());

        let created = self.repository.insert(entity).await?;
        tracing::info!(
            entity_type = T::entity_type(),
            id = created.id(),
            "entity created"
        );
        Ok(created)
    }

    /// Overwrite a record, keeping its original `created_at`
    ///
    /// The relationship check is not run here; only [`delete`](Self::delete) is guarded.
    pub async fn update(&self, entity: T) -> InvoicingResult<T> {
        self.update_with(entity, UpdateOptions::default()).await
    }

    pub async fn update_with(&self, mut entity: T, options: UpdateOptions) -> InvoicingResult<T> {
        let existing = self.get_required(entity.id()).await?;

        entity.set_created_at(existing.created_at());
        if !options.overwrite_state {
            entity.set_state(existing.state());
        }
        if !options.overwrite_deleted_at {
            entity.set_deleted_at(existing.deleted_at());
        }

        self.repository.update(entity.clone()).await?;
        tracing::info!(
            entity_type = T::entity_type(),
            id = entity.id(),
            "entity updated"
        );
        Ok(entity)
    }

    /// Soft-delete a record unless an active record still references it
    ///
    /// Runs the relationship check first, then one read and one write.
    /// Nothing is written when the check fails or the record is missing.
    pub async fn delete(&self, id: EntityId) -> InvoicingResult<EntityId> {
        let entity_type = T::entity_type();

        if !self.validator.can_delete::<T>(id).await? {
            tracing::info!(entity_type, id, "delete blocked by active references");
            return Err(EntityError::HasDependents {
                entity_type: entity_type.to_string(),
                id,
            }
            .into());
        }

        let mut entity = self.get_required(id).await?;

        if !entity.is_active() && self.already_deleted == AlreadyDeletedPolicy::NotFound {
            tracing::debug!(entity_type, id, "entity already deleted");
            return Err(EntityError::not_found(entity_type, id).into());
        }

        entity.mark_deleted((self.clock)());
        self.repository.update(entity).await?;

        tracing::info!(entity_type, id, "entity soft-deleted");
        Ok(id)
    }
}

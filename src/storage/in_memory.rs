//! In-memory implementation of Repository for testing and development

use crate::core::entity::{Entity, EntityId};
use crate::core::error::StorageError;
use crate::core::repository::{ForeignKey, Repository};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in-memory";

/// In-memory repository implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and an atomic sequence for id assignment, starting at 1.
#[derive(Clone)]
pub struct InMemoryRepository<T: Entity> {
    records: Arc<RwLock<BTreeMap<EntityId, T>>>,
    next_id: Arc<AtomicI64>,
}

impl<T: Entity> InMemoryRepository<T> {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Snapshot of every stored record, active or not, ordered by id
    pub fn all(&self) -> Result<Vec<T>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.values().cloned().collect())
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.get(&id).cloned())
    }

    async fn insert(&self, mut entity: T) -> Result<T, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire write lock: {}", e)))?;

        entity.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        records.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire write lock: {}", e)))?;

        let slot = records.get_mut(&entity.id()).ok_or_else(|| {
            StorageError::query(
                BACKEND,
                format!("no {} row with id {}", T::entity_type(), entity.id()),
            )
        })?;
        *slot = entity;

        Ok(())
    }

    async fn has_active_reference(
        &self,
        foreign_key: &ForeignKey<T>,
        id: EntityId,
    ) -> Result<bool, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.values().any(|record| foreign_key.matches(record, id)))
    }
}

//! Repository trait implemented by every storage backend

use crate::core::entity::{Entity, EntityId};
use crate::core::error::StorageError;
use async_trait::async_trait;

/// A declared foreign key on a dependent entity type `D`
///
/// `column` names the field for backends that query by name (SQL), while
/// `accessor` reads it directly for backends that hold typed values.
pub struct ForeignKey<D: Entity> {
    /// Field name on the dependent record (e.g., "invoice_id")
    pub column: &'static str,

    /// Typed read of the foreign key; `None` when the reference is unset
    pub accessor: fn(&D) -> Option<EntityId>,

    /// Always the entity's own `state`; SQL backends read the `state` column
    active: fn(&D) -> bool,
}

impl<D: Entity> ForeignKey<D> {
    /// Declare a foreign key using the entity's own `state` as the active flag
    pub fn new(column: &'static str, accessor: fn(&D) -> Option<EntityId>) -> Self {
        Self {
            column,
            accessor,
            active: D::is_active,
        }
    }

    /// Whether `entity` is an active record pointing at `id`
    pub fn matches(&self, entity: &D, id: EntityId) -> bool {
        (self.active)(entity) && (self.accessor)(entity) == Some(id)
    }
}

impl<D: Entity> Clone for ForeignKey<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Entity> Copy for ForeignKey<D> {}

impl<D: Entity> std::fmt::Debug for ForeignKey<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForeignKey")
            .field("entity_type", &D::entity_type())
            .field("column", &self.column)
            .finish()
    }
}

/// Persistence operations for a single entity type
///
/// Implementations are storage-agnostic from the service's point of view;
/// every failure is reported as a [`StorageError`].
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Get a record by id, whatever its state
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StorageError>;

    /// Insert a new record; the store assigns and returns the id
    async fn insert(&self, entity: T) -> Result<T, StorageError>;

    /// Overwrite an existing record
    async fn update(&self, entity: T) -> Result<(), StorageError>;

    /// Whether an active record holds `id` in the given foreign key
    async fn has_active_reference(
        &self,
        foreign_key: &ForeignKey<T>,
        id: EntityId,
    ) -> Result<bool, StorageError>;
}

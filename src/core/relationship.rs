//! Relationship registry and the delete-guard validator
//!
//! The registry is a table, built once at startup, from each referenced
//! entity type to the foreign keys that point at it. The validator walks
//! that table to decide whether a record can be soft-deleted: it can, unless
//! some active record of any registered type still references it.
//!
//! ```rust,ignore
//! let mut registry = RelationshipRegistry::new();
//! registry
//!     .register_entity::<Invoice>()
//!     .register_entity::<InvoiceLine>()
//!     .declare::<Invoice, InvoiceLine>(
//!         lines_repository,
//!         ForeignKey::new("invoice_id", |line| Some(line.invoice_id)),
//!     );
//!
//! let validator = RelationshipValidator::new(Arc::new(registry));
//! assert!(validator.can_delete::<Invoice>(1).await?);
//! ```

use crate::core::entity::{Entity, EntityId};
use crate::core::error::{EntityError, InvoicingResult, StorageError};
use crate::core::repository::{ForeignKey, Repository};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Type-erased check for one declared relationship
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    /// The entity type holding the foreign key
    fn dependent_type(&self) -> &'static str;

    /// The foreign key field on the dependent type
    fn foreign_key(&self) -> &'static str;

    /// Whether an active dependent record references `id`
    async fn has_active_reference(&self, id: EntityId) -> Result<bool, StorageError>;
}

/// A foreign key bound to the repository that stores the dependent type
struct RepositoryDependency<D: Entity> {
    repository: Arc<dyn Repository<D>>,
    foreign_key: ForeignKey<D>,
}

#[async_trait]
impl<D: Entity> DependencyCheck for RepositoryDependency<D> {
    fn dependent_type(&self) -> &'static str {
        D::entity_type()
    }

    fn foreign_key(&self) -> &'static str {
        self.foreign_key.column
    }

    async fn has_active_reference(&self, id: EntityId) -> Result<bool, StorageError> {
        self.repository
            .has_active_reference(&self.foreign_key, id)
            .await
    }
}

/// Static table of known entity types and the relationships between them
#[derive(Default, Clone)]
pub struct RelationshipRegistry {
    entity_types: BTreeSet<&'static str>,
    dependents: HashMap<&'static str, Vec<Arc<dyn DependencyCheck>>>,
}

impl RelationshipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an entity type known to the registry
    pub fn register_entity<T: Entity>(&mut self) -> &mut Self {
        self.entity_types.insert(T::entity_type());
        self
    }

    /// Declare that `D` references `T` through `foreign_key`
    ///
    /// `T` and `D` may be the same type (self-reference). Both types are
    /// registered as a side effect.
    pub fn declare<T: Entity, D: Entity>(
        &mut self,
        repository: Arc<dyn Repository<D>>,
        foreign_key: ForeignKey<D>,
    ) -> &mut Self {
        tracing::debug!(
            target_type = T::entity_type(),
            dependent_type = D::entity_type(),
            foreign_key = foreign_key.column,
            "declared relationship"
        );

        self.register_entity::<T>().register_entity::<D>();
        self.dependents
            .entry(T::entity_type())
            .or_default()
            .push(Arc::new(RepositoryDependency {
                repository,
                foreign_key,
            }));
        self
    }

    /// Relationships pointing at `entity_type`, in declaration order
    pub fn dependents_of(&self, entity_type: &str) -> &[Arc<dyn DependencyCheck>] {
        self.dependents
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.entity_types.contains(entity_type)
    }

    /// All registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&'static str> {
        self.entity_types.iter().copied().collect()
    }
}

impl std::fmt::Debug for RelationshipRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let relationships: Vec<String> = self
            .dependents
            .iter()
            .flat_map(|(target, checks)| {
                checks.iter().map(move |check| {
                    format!(
                        "{}.{} -> {}",
                        check.dependent_type(),
                        check.foreign_key(),
                        target
                    )
                })
            })
            .collect();

        f.debug_struct("RelationshipRegistry")
            .field("entity_types", &self.entity_types)
            .field("relationships", &relationships)
            .finish()
    }
}

/// Decides whether a record may be soft-deleted
#[derive(Clone, Debug)]
pub struct RelationshipValidator {
    registry: Arc<RelationshipRegistry>,
}

impl RelationshipValidator {
    pub fn new(registry: Arc<RelationshipRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RelationshipRegistry {
        &self.registry
    }

    /// `true` if no active record of any registered type references `(T, id)`
    ///
    /// The id does not have to exist. Store failures are returned as errors,
    /// never folded into `false`.
    pub async fn can_delete<T: Entity>(&self, id: EntityId) -> InvoicingResult<bool> {
        self.can_delete_type(T::entity_type(), id).await
    }

    /// Same as [`can_delete`](Self::can_delete) for a type known only by name
    ///
    /// A name the registry does not know fails with
    /// [`EntityError::UnknownType`] instead of passing the guard.
    pub async fn can_delete_type(&self, entity_type: &str, id: EntityId) -> InvoicingResult<bool> {
        if !self.registry.contains(entity_type) {
            return Err(EntityError::UnknownType {
                entity_type: entity_type.to_string(),
            }
            .into());
        }

        for check in self.registry.dependents_of(entity_type) {
            let referenced = check.has_active_reference(id).await.inspect_err(|e| {
                tracing::warn!(
                    entity_type,
                    id,
                    dependent_type = check.dependent_type(),
                    error = %e,
                    "reference check failed"
                )
            })?;

            if referenced {
                tracing::debug!(
                    entity_type,
                    id,
                    dependent_type = check.dependent_type(),
                    foreign_key = check.foreign_key(),
                    "active reference found"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }
}

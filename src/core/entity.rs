//! Entity trait defining the audit capabilities shared by every record type

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Identifier assigned by the store when a record is first persisted.
///
/// `0` means "not yet persisted".
pub type EntityId = i64;

/// Base trait for all entities in the system.
///
/// Every entity carries the same audit fields:
/// - id: Unique identifier, assigned by the store on insert
/// - state: `true` while the record is active, `false` once soft-deleted
/// - created_at: Creation timestamp, immutable after the first insert
/// - deleted_at: Soft deletion timestamp (optional)
///
/// Implementations are normally generated with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The singular type name (e.g., "invoice", "invoice_line")
    fn entity_type() -> &'static str;

    /// The plural resource name used in URLs (e.g., "invoices")
    fn resource_name() -> &'static str;

    // === Audit Fields ===

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Active flag (`true` = visible, `false` = soft-deleted)
    fn state(&self) -> bool;

    fn set_state(&mut self, state: bool);

    fn created_at(&self) -> DateTime<Utc>;

    fn set_created_at(&mut self, created_at: DateTime<Utc>);

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>);

    // === Lifecycle Helpers ===

    /// Check if the entity is active
    fn is_active(&self) -> bool {
        self.state()
    }

    /// Reset the audit fields for a freshly created record
    fn mark_created(&mut self, now: DateTime<Utc>) {
        self.set_created_at(now);
        self.set_state(true);
        self.set_deleted_at(None);
    }

    /// Flag the record as logically deleted
    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.set_deleted_at(Some(now));
        self.set_state(false);
    }
}

//! Macros for reducing boilerplate when defining entities
//!
//! Every entity repeats the same four audit fields and the same
//! [`Entity`](crate::core::entity::Entity) accessors; `impl_entity!`
//! generates both from the domain-specific field list.

/// Define an entity struct with audit fields and its `Entity` implementation
///
/// The generated struct carries `id`, `state`, `created_at` and `deleted_at`
/// followed by the listed fields. Audit fields default when absent from a
/// JSON payload, so request bodies only need the domain fields.
///
/// # Example
///
/// ```rust,ignore
/// use invoicing::prelude::*;
///
/// impl_entity!(
///     Invoice,
///     "invoice",
///     "invoices",
///     {
///         customer: String,
///         date: DateTime<Utc>,
///     }
/// );
///
/// // Not yet persisted: id 0, active, created now
/// let invoice = Invoice::new("ACME".to_string(), Utc::now());
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $type_name:expr,
        $plural:expr,
        {
            $( $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Store-assigned identifier (0 until persisted)
            #[serde(default)]
            pub id: $crate::core::entity::EntityId,

            /// Active flag; false once soft-deleted
            #[serde(default)]
            pub state: bool,

            /// When this entity was created
            #[serde(default)]
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was soft-deleted (if applicable)
            #[serde(default)]
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,
            $( pub $specific_field : $specific_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn entity_type() -> &'static str {
                $type_name
            }

            fn resource_name() -> &'static str {
                $plural
            }

            fn id(&self) -> $crate::core::entity::EntityId {
                self.id
            }

            fn set_id(&mut self, id: $crate::core::entity::EntityId) {
                self.id = id;
            }

            fn state(&self) -> bool {
                self.state
            }

            fn set_state(&mut self, state: bool) {
                self.state = state;
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn set_created_at(&mut self, created_at: ::chrono::DateTime<::chrono::Utc>) {
                self.created_at = created_at;
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, deleted_at: Option<::chrono::DateTime<::chrono::Utc>>) {
                self.deleted_at = deleted_at;
            }
        }

        impl $type {
            /// Create a new, not yet persisted, active instance
            #[allow(dead_code)]
            pub fn new($( $specific_field: $specific_type ),*) -> Self {
                Self {
                    id: 0,
                    state: true,
                    created_at: ::chrono::Utc::now(),
                    deleted_at: None,
                    $( $specific_field ),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::entity::{Entity, EntityId};

    crate::impl_entity!(Widget, "widget", "widgets", {
        owner_id: EntityId,
        label: String,
    });

    #[test]
    fn test_generated_metadata() {
        assert_eq!(Widget::entity_type(), "widget");
        assert_eq!(Widget::resource_name(), "widgets");
    }

    #[test]
    fn test_new_is_active_and_unpersisted() {
        let widget = Widget::new(4, "gear".to_string());
        assert_eq!(widget.id(), 0);
        assert!(widget.is_active());
        assert!(widget.deleted_at().is_none());
        assert_eq!(widget.owner_id, 4);
    }

    #[test]
    fn test_audit_fields_default_when_absent() {
        let widget: Widget =
            serde_json::from_value(serde_json::json!({"owner_id": 1, "label": "bolt"})).unwrap();
        assert_eq!(widget.id, 0);
        assert!(!widget.state);
        assert!(widget.deleted_at.is_none());
        assert_eq!(widget.label, "bolt");
    }

    #[test]
    fn test_serialized_shape() {
        let mut widget = Widget::new(2, "nut".to_string());
        widget.set_id(9);
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["state"], true);
        assert_eq!(json["owner_id"], 2);
        assert!(json["deleted_at"].is_null());
        assert!(json["created_at"].is_string());
    }
}

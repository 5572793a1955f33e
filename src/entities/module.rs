//! Module definition for the invoicing service
//!
//! Manages invoices and their line-items. A line references its invoice
//! through `invoice_id`, so an invoice cannot be deleted while one of its
//! lines is still active.

use super::{Invoice, InvoiceLine};
use crate::core::module::{Module, ServiceContext};
use crate::core::relationship::RelationshipRegistry;
use crate::core::repository::Repository;
use crate::server::descriptor::CrudDescriptor;
use crate::server::entity_registry::EntityRegistry;
use crate::storage::InMemoryRepository;
use std::sync::Arc;

/// Invoicing module, generic over the repository backend
#[derive(Clone)]
pub struct InvoicingModule {
    invoices: Arc<dyn Repository<Invoice>>,
    lines: Arc<dyn Repository<InvoiceLine>>,
}

impl InvoicingModule {
    pub fn new(
        invoices: Arc<dyn Repository<Invoice>>,
        lines: Arc<dyn Repository<InvoiceLine>>,
    ) -> Self {
        Self { invoices, lines }
    }

    /// Module backed by fresh in-memory repositories
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::<Invoice>::new()),
            Arc::new(InMemoryRepository::<InvoiceLine>::new()),
        )
    }

    /// Module backed by PostgreSQL; the schema must already exist
    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use crate::storage::PostgresRepository;

        Self::new(
            Arc::new(PostgresRepository::<Invoice>::new(pool.clone())),
            Arc::new(PostgresRepository::<InvoiceLine>::new(pool)),
        )
    }
}

impl Module for InvoicingModule {
    fn name(&self) -> &str {
        "invoicing"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn entity_types(&self) -> Vec<&str> {
        vec!["invoice", "invoice_line"]
    }

    fn declare_relationships(&self, registry: &mut RelationshipRegistry) {
        registry
            .register_entity::<Invoice>()
            .register_entity::<InvoiceLine>()
            .declare::<Invoice, InvoiceLine>(self.lines.clone(), InvoiceLine::invoice_key());
    }

    fn register_entities(&self, registry: &mut EntityRegistry, context: &ServiceContext) {
        registry.register(Box::new(CrudDescriptor::new(
            context.service(self.invoices.clone()),
        )));
        registry.register(Box::new(CrudDescriptor::new(
            context.service(self.lines.clone()),
        )));
    }
}

//! Invoice line-item entity

use crate::core::entity::EntityId;
use crate::core::repository::ForeignKey;

crate::impl_entity!(
    InvoiceLine,
    "invoice_line",
    "invoice_lines",
    {
        invoice_id: EntityId,
        product: String,
        quantity: i32,
        unit_price: f64,
    }
);

impl InvoiceLine {
    /// `invoice_line.invoice_id -> invoice.id`
    pub fn invoice_key() -> ForeignKey<InvoiceLine> {
        ForeignKey::new("invoice_id", |line: &InvoiceLine| Some(line.invoice_id))
    }

    pub fn total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

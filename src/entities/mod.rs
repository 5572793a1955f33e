//! Entities module - the invoicing records and the module that wires them

#[macro_use]
pub mod macros;

pub mod invoice;
pub mod invoice_line;
pub mod module;

pub use invoice::Invoice;
pub use invoice_line::InvoiceLine;
pub use module::InvoicingModule;

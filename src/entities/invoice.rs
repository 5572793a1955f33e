//! Invoice entity

use chrono::{DateTime, Utc};

crate::impl_entity!(
    Invoice,
    "invoice",
    "invoices",
    {
        customer: String,
        date: DateTime<Utc>,
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;

    #[test]
    fn test_invoice_metadata() {
        assert_eq!(Invoice::entity_type(), "invoice");
        assert_eq!(Invoice::resource_name(), "invoices");
    }

    #[test]
    fn test_invoice_from_request_body() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "customer": "ACME",
            "date": "2024-03-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(invoice.customer, "ACME");
        assert_eq!(invoice.date.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(invoice.id, 0);
    }
}

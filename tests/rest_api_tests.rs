//! End-to-end tests for the invoicing REST API over the in-memory backend

use axum::http::StatusCode;
use axum_test::TestServer;
use invoicing::prelude::*;
use serde_json::{Value, json};

fn server_with(config: ServiceConfig) -> TestServer {
    let app = ServerBuilder::new()
        .with_service_config(config)
        .register_module(InvoicingModule::in_memory())
        .unwrap()
        .build()
        .unwrap();
    TestServer::new(app).unwrap()
}

fn server() -> TestServer {
    server_with(ServiceConfig::default())
}

async fn create_invoice(server: &TestServer, customer: &str) -> Value {
    let response = server
        .post("/api/invoices")
        .json(&json!({"customer": customer, "date": "2024-03-01T00:00:00Z"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["content"].clone()
}

async fn create_line(server: &TestServer, invoice_id: i64) -> Value {
    let response = server
        .post("/api/invoice_lines")
        .json(&json!({
            "invoice_id": invoice_id,
            "product": "widget",
            "quantity": 2,
            "unit_price": 9.5
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["content"].clone()
}

#[tokio::test]
async fn test_create_then_get() {
    let server = server();

    let response = server
        .post("/api/invoices")
        .json(&json!({"customer": "ACME", "date": "2024-03-01T00:00:00Z"}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["is_successful"], true);
    assert_eq!(body["message"], "Record stored successfully");
    assert_eq!(body["content"]["id"], 1);
    assert_eq!(body["content"]["state"], true);
    assert!(body["content"]["deleted_at"].is_null());

    let fetched = server.get("/api/invoices/1").await;
    fetched.assert_status_ok();
    let invoice: Invoice = fetched.json();
    assert_eq!(invoice.customer, "ACME");
    assert!(invoice.state);
}

#[tokio::test]
async fn test_create_ignores_supplied_audit_fields() {
    let server = server();

    let response = server
        .post("/api/invoices")
        .json(&json!({
            "id": 77,
            "state": false,
            "created_at": "2001-01-01T00:00:00Z",
            "deleted_at": "2001-01-02T00:00:00Z",
            "customer": "ACME",
            "date": "2024-03-01T00:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let invoice: Invoice = serde_json::from_value(response.json::<Value>()["content"].clone()).unwrap();
    assert_eq!(invoice.id, 1);
    assert!(invoice.state);
    assert!(invoice.deleted_at.is_none());
    assert!(invoice.created_at.timestamp() > 978_307_200);
}

#[tokio::test]
async fn test_delete_blocked_by_active_line() {
    let server = server();
    let invoice = create_invoice(&server, "ACME").await;
    let line = create_line(&server, invoice["id"].as_i64().unwrap()).await;

    let response = server.delete("/api/invoices/1").await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "ENTITY_HAS_DEPENDENTS");
    assert_eq!(body["details"], json!({"entity_type": "invoice", "id": 1}));

    // Nothing was modified
    let unchanged: Invoice = server.get("/api/invoices/1").await.json();
    assert!(unchanged.state);
    assert!(unchanged.deleted_at.is_none());

    // Deactivate the line, then the invoice can go
    server
        .delete(&format!("/api/invoice_lines/{}", line["id"]))
        .await
        .assert_status_ok();

    let response = server.delete("/api/invoices/1").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Record successfully deleted");
    assert_eq!(body["content"], 1);

    let deleted: Invoice = server.get("/api/invoices/1").await.json();
    assert!(!deleted.state);
    assert!(deleted.deleted_at.is_some());
}

#[tokio::test]
async fn test_line_deactivated_by_update_no_longer_blocks() {
    let server = server();
    create_invoice(&server, "ACME").await;
    let mut line = create_line(&server, 1).await;

    line["state"] = json!(false);
    server
        .put("/api/invoice_lines")
        .json(&line)
        .await
        .assert_status_ok();

    server.delete("/api/invoices/1").await.assert_status_ok();
}

#[tokio::test]
async fn test_line_on_other_invoice_does_not_block() {
    let server = server();
    create_invoice(&server, "ACME").await;
    create_invoice(&server, "Globex").await;
    create_line(&server, 2).await;

    server.delete("/api/invoices/1").await.assert_status_ok();
    server
        .delete("/api/invoices/2")
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_nonexistent_is_not_found() {
    let server = server();

    let response = server.delete("/api/invoices/9999").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "ENTITY_NOT_FOUND");
}

#[tokio::test]
async fn test_reference_to_missing_invoice_is_conflict() {
    let server = server();
    create_line(&server, 9999).await;

    // The reference check runs before the lookup
    let response = server.delete("/api/invoices/9999").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "ENTITY_HAS_DEPENDENTS");
}

#[tokio::test]
async fn test_second_delete_is_not_found_by_default() {
    let server = server();
    create_invoice(&server, "ACME").await;

    server.delete("/api/invoices/1").await.assert_status_ok();
    let first: Invoice = server.get("/api/invoices/1").await.json();

    server
        .delete("/api/invoices/1")
        .await
        .assert_status_not_found();

    let second: Invoice = server.get("/api/invoices/1").await.json();
    assert_eq!(first.deleted_at, second.deleted_at);
}

#[tokio::test]
async fn test_second_delete_succeeds_with_restamp_policy() {
    let server = server_with(ServiceConfig {
        already_deleted: AlreadyDeletedPolicy::Restamp,
    });
    create_invoice(&server, "ACME").await;

    server.delete("/api/invoices/1").await.assert_status_ok();
    server.delete("/api/invoices/1").await.assert_status_ok();

    let invoice: Invoice = server.get("/api/invoices/1").await.json();
    assert!(!invoice.state);
}

#[tokio::test]
async fn test_update_preserves_created_at() {
    let server = server();
    let created = create_invoice(&server, "ACME").await;

    let mut changed = created.clone();
    changed["customer"] = json!("ACME Corp");
    changed["created_at"] = json!("1999-12-31T00:00:00Z");

    let response = server.put("/api/invoices").json(&changed).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Record updated successfully");
    assert_eq!(body["content"]["created_at"], created["created_at"]);

    let stored: Value = server.get("/api/invoices/1").await.json();
    assert_eq!(stored["customer"], "ACME Corp");
    assert_eq!(stored["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_update_without_state_keeps_record_active() {
    let server = server();
    create_invoice(&server, "ACME").await;

    server
        .put("/api/invoices")
        .json(&json!({"id": 1, "customer": "Initech", "date": "2024-04-01T00:00:00Z"}))
        .await
        .assert_status_ok();

    let stored: Invoice = server.get("/api/invoices/1").await.json();
    assert_eq!(stored.customer, "Initech");
    assert!(stored.state);
}

#[tokio::test]
async fn test_update_is_not_guarded_by_relationships() {
    let server = server();
    let mut invoice = create_invoice(&server, "ACME").await;
    create_line(&server, 1).await;

    invoice["state"] = json!(false);
    server
        .put("/api/invoices")
        .json(&invoice)
        .await
        .assert_status_ok();

    let stored: Invoice = server.get("/api/invoices/1").await.json();
    assert!(!stored.state);
}

#[tokio::test]
async fn test_update_nonexistent_is_not_found() {
    let server = server();

    server
        .put("/api/invoices")
        .json(&json!({"id": 42, "customer": "Nobody", "date": "2024-03-01T00:00:00Z"}))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let server = server();

    let response = server.get("/api/invoice_lines/5").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["details"]["entity_type"], "invoice_line");
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let server = server();

    let response = server.get("/api/invoices/abc").await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "INVALID_ENTITY_ID");

    server
        .delete("/api/invoices/1.5")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_update_with_wrong_field_types_is_bad_request() {
    let server = server();
    create_invoice(&server, "ACME").await;

    let response = server
        .put("/api/invoices")
        .json(&json!({"id": 1, "customer": 12, "date": "2024-03-01T00:00:00Z"}))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_create_with_missing_fields_is_rejected() {
    let server = server();

    let response = server
        .post("/api/invoice_lines")
        .json(&json!({"product": "widget"}))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_health_routes() {
    let server = server();

    for path in ["/health", "/healthz"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "invoicing-rs");
    }
}

//! Invoicing API
//!
//! Serves invoices and invoice lines over REST. Reads `config.yaml` from the
//! working directory when present (or the path in `INVOICING_CONFIG`), then
//! applies environment overrides.
//!
//! ```text
//! cargo run --example invoicing_api
//! cargo run --example invoicing_api --features postgres   # with storage.backend: postgres
//! ```

use anyhow::Result;
use invoicing::config::AppConfig;
use invoicing::prelude::*;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    invoicing::logging::init(&config.logging)?;

    let module = build_module(&config).await?;

    tracing::info!(
        module = module.name(),
        version = module.version(),
        backend = ?config.storage.backend,
        already_deleted = ?config.service.already_deleted,
        "starting invoicing API"
    );
    tracing::info!("routes: POST|PUT /api/invoices, GET|DELETE /api/invoices/{{id}}");
    tracing::info!("routes: POST|PUT /api/invoice_lines, GET|DELETE /api/invoice_lines/{{id}}");

    ServerBuilder::new()
        .with_service_config(config.service)
        .register_module(module)?
        .serve(&config.server.bind_address())
        .await
}

fn load_config() -> Result<AppConfig> {
    let path = std::env::var("INVOICING_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));

    let config = if path.exists() {
        AppConfig::from_yaml_file(&path)?
    } else {
        AppConfig::default()
    };

    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

async fn build_module(config: &AppConfig) -> Result<InvoicingModule> {
    match config.storage.backend {
        StorageBackend::InMemory => Ok(InvoicingModule::in_memory()),
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let pool = invoicing::storage::postgres::connect(&config.storage.postgres).await?;
            invoicing::storage::postgres::ensure_schema(&pool).await?;
            Ok(InvoicingModule::postgres(pool))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("storage.backend is postgres but the `postgres` feature is not enabled")
        }
    }
}

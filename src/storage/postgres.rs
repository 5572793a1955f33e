//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresRepository<T>` backed by a PostgreSQL database via
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoicing-rs = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! All entity types share one `entities` table. Audit fields live in their
//! own columns; the full record is kept as JSONB in `data`, which is where
//! foreign keys are read from.

use crate::config::PostgresConfig;
use crate::core::entity::{Entity, EntityId};
use crate::core::error::StorageError;
use crate::core::repository::{ForeignKey, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::marker::PhantomData;
use std::time::Duration;

const BACKEND: &str = "PostgreSQL";

const CREATE_ENTITIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id          BIGSERIAL PRIMARY KEY,
    entity_type TEXT        NOT NULL,
    state       BOOLEAN     NOT NULL DEFAULT TRUE,
    created_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ,
    data        JSONB       NOT NULL
)"#;

const CREATE_ENTITIES_TYPE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_entities_type_state ON entities (entity_type, state)";

fn query_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Unavailable {
            backend: BACKEND.to_string(),
        },
        sqlx::Error::Io(e) => StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        },
        other => StorageError::query(BACKEND, other.to_string()),
    }
}

/// Open a connection pool from configuration
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, StorageError> {
    tracing::info!(
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Create the shared `entities` table if it does not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(CREATE_ENTITIES_TABLE)
        .execute(pool)
        .await
        .map_err(query_error)?;
    sqlx::query(CREATE_ENTITIES_TYPE_INDEX)
        .execute(pool)
        .await
        .map_err(query_error)?;
    Ok(())
}

/// Generic repository backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresRepository<T> {
    pool: PgPool,
    _marker: PhantomData<T>,
}

impl<T: Entity> PostgresRepository<T> {
    /// Create a new `PostgresRepository` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn to_data(entity: &T) -> Result<serde_json::Value, StorageError> {
        serde_json::to_value(entity).map_err(|e| StorageError::Serialization {
            entity_type: T::entity_type().to_string(),
            message: e.to_string(),
        })
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> Result<T, StorageError> {
        let data: serde_json::Value = row.try_get("data").map_err(query_error)?;
        let mut entity: T =
            serde_json::from_value(data).map_err(|e| StorageError::Serialization {
                entity_type: T::entity_type().to_string(),
                message: e.to_string(),
            })?;

        // Columns are authoritative for the audit fields
        entity.set_id(row.try_get("id").map_err(query_error)?);
        entity.set_state(row.try_get("state").map_err(query_error)?);
        entity.set_created_at(row.try_get::<DateTime<Utc>, _>("created_at").map_err(query_error)?);
        entity.set_deleted_at(
            row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")
                .map_err(query_error)?,
        );
        Ok(entity)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for PostgresRepository<T> {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<T>, StorageError> {
        let row = sqlx::query(
            "SELECT id, state, created_at, deleted_at, data FROM entities \
             WHERE entity_type = $1 AND id = $2",
        )
        .bind(T::entity_type())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn insert(&self, mut entity: T) -> Result<T, StorageError> {
        let data = Self::to_data(&entity)?;

        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO entities (entity_type, state, created_at, deleted_at, data) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(T::entity_type())
        .bind(entity.state())
        .bind(entity.created_at())
        .bind(entity.deleted_at())
        .bind(data)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;

        entity.set_id(id);
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<(), StorageError> {
        let data = Self::to_data(&entity)?;

        let result = sqlx::query(
            "UPDATE entities SET state = $3, created_at = $4, deleted_at = $5, data = $6 \
             WHERE entity_type = $1 AND id = $2",
        )
        .bind(T::entity_type())
        .bind(entity.id())
        .bind(entity.state())
        .bind(entity.created_at())
        .bind(entity.deleted_at())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::query(
                BACKEND,
                format!("no {} row with id {}", T::entity_type(), entity.id()),
            ));
        }
        Ok(())
    }

    async fn has_active_reference(
        &self,
        foreign_key: &ForeignKey<T>,
        id: EntityId,
    ) -> Result<bool, StorageError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM entities \
             WHERE entity_type = $1 AND state AND (data ->> $2)::BIGINT = $3)",
        )
        .bind(T::entity_type())
        .bind(foreign_key.column)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)
    }
}

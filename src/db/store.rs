use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::db::models::PriceRow;
use crate::error::{AppError, Result};
use crate::types::ObservationRecord;

/// Durable, append-only history of observation records, queryable by
/// product identity. Absence of history is `Ok(None)`, never an error;
/// errors mean the backing store itself failed.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Idempotently ensures the `prices` table exists. Fatal at startup if
    /// it fails; never retried internally.
    async fn initialize(&self) -> Result<()>;

    /// Durably appends one record. No in-call retry: the caller decides
    /// whether to retry the whole cycle on the next tick.
    async fn append(&self, record: &ObservationRecord) -> Result<()>;

    /// Most recent record for the product, by capture time then insertion
    /// order.
    async fn latest(&self, product_name: &str) -> Result<Option<ObservationRecord>>;

    /// Record holding the maximum `new_price` for the product. Ties resolve
    /// to the first time that maximum was reached.
    async fn extreme_max(&self, product_name: &str) -> Result<Option<ObservationRecord>>;
}

/// Postgres-backed store. One pool owned for the process lifetime; every
/// query hits the database, with no caching layer in front of it.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await
            .map_err(AppError::StorageUnavailable)?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HistoryStore for PostgresStore {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prices (
                id BIGSERIAL PRIMARY KEY,
                product_name TEXT NOT NULL,
                old_price BIGINT NOT NULL,
                new_price BIGINT NOT NULL,
                installment_price BIGINT NOT NULL,
                captured_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(AppError::StorageUnavailable)?;

        Ok(())
    }

    async fn append(&self, record: &ObservationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO prices (product_name, old_price, new_price, installment_price, captured_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.product_name)
        .bind(record.old_price)
        .bind(record.new_price)
        .bind(record.installment_price)
        .bind(record.captured_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::StorageWrite)?;

        Ok(())
    }

    async fn latest(&self, product_name: &str) -> Result<Option<ObservationRecord>> {
        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT id, product_name, old_price, new_price, installment_price, captured_at
            FROM prices
            WHERE product_name = $1
            ORDER BY captured_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::StorageRead)?;

        Ok(row.map(ObservationRecord::from))
    }

    async fn extreme_max(&self, product_name: &str) -> Result<Option<ObservationRecord>> {
        // Ties on new_price resolve to the earliest capture, i.e. the first
        // time the maximum was reached.
        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT id, product_name, old_price, new_price, installment_price, captured_at
            FROM prices
            WHERE product_name = $1
            ORDER BY new_price DESC, captured_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::StorageRead)?;

        Ok(row.map(ObservationRecord::from))
    }
}

use safar_core::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

use crate::app_config::DatabaseConfig;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!("Connected to Postgres (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }
}

/// Database errors are passed to callers verbatim.
pub(crate) fn db_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(e) => StoreError::Database(e.message().to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

/// Rejects a row whose text column holds a value the domain does not know.
pub(crate) fn bad_column(err: safar_core::CoreError) -> StoreError {
    StoreError::Database(err.to_string())
}

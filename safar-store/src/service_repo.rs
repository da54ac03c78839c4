use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safar_core::repository::ServiceRepository;
use safar_core::{Service, ServiceStatus, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{bad_column, db_err};

const SERVICE_COLUMNS: &str = "id, title, description, icon, featured, status, created_at, updated_at";

pub struct StoreServiceRepository {
    pool: PgPool,
}

impl StoreServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    icon: Option<String>,
    featured: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Service {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            icon: row.icon.unwrap_or_default(),
            featured: row.featured,
            status: row.status.parse().map_err(bad_column)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ServiceRepository for StoreServiceRepository {
    async fn create_service(&self, service: &Service) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (id, title, description, icon, featured, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(service.id)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(service.featured)
        .bind(service.status.as_str())
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        let row: Option<ServiceRow> =
            sqlx::query_as(&format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(Service::try_from).transpose()
    }

    async fn list_services(&self, status: Option<ServiceStatus>) -> StoreResult<Vec<Service>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM services WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
            SERVICE_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Service::try_from).collect()
    }

    async fn update_service(&self, service: &Service) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET title = $1, description = $2, icon = $3, featured = $4, status = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(service.featured)
        .bind(service.status.as_str())
        .bind(service.updated_at)
        .bind(service.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Service"));
        }
        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Service"));
        }
        Ok(())
    }

    async fn count_services(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

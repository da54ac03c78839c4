use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safar_core::repository::JourneyRepository;
use safar_core::{Journey, JourneyFilter, StoreError, StoreResult};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{bad_column, db_err};

const JOURNEY_COLUMNS: &str = "id, title, description, price, duration, days, nights, location, category, status, \
     featured, rating, main_image_url, itinerary, inclusions, exclusions, created_at, updated_at";

pub struct StoreJourneyRepository {
    pool: PgPool,
}

impl StoreJourneyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JourneyRow {
    id: Uuid,
    title: String,
    description: String,
    price: i64,
    duration: String,
    days: i32,
    nights: i32,
    location: String,
    category: String,
    status: String,
    featured: bool,
    rating: Option<f64>,
    main_image_url: Option<String>,
    itinerary: Option<Value>,
    inclusions: Option<Vec<String>>,
    exclusions: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JourneyRow> for Journey {
    type Error = StoreError;

    fn try_from(row: JourneyRow) -> Result<Self, Self::Error> {
        let itinerary = match row.itinerary {
            Some(Value::Array(days)) => days,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        };
        Ok(Journey {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            duration: row.duration,
            days: row.days,
            nights: row.nights,
            location: row.location,
            category: row.category.parse().map_err(bad_column)?,
            status: row.status.parse().map_err(bad_column)?,
            featured: row.featured,
            rating: row.rating,
            main_image_url: row.main_image_url,
            itinerary,
            inclusions: row.inclusions.unwrap_or_default(),
            exclusions: row.exclusions.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl JourneyRepository for StoreJourneyRepository {
    async fn create_journey(&self, journey: &Journey) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO packages (id, title, description, price, duration, days, nights, location, category, status,
                                  featured, rating, main_image_url, itinerary, inclusions, exclusions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(journey.id)
        .bind(&journey.title)
        .bind(&journey.description)
        .bind(journey.price)
        .bind(&journey.duration)
        .bind(journey.days)
        .bind(journey.nights)
        .bind(&journey.location)
        .bind(journey.category.as_str())
        .bind(journey.status.as_str())
        .bind(journey.featured)
        .bind(journey.rating)
        .bind(&journey.main_image_url)
        .bind(Value::Array(journey.itinerary.clone()))
        .bind(&journey.inclusions)
        .bind(&journey.exclusions)
        .bind(journey.created_at)
        .bind(journey.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_journey(&self, id: Uuid) -> StoreResult<Option<Journey>> {
        let row: Option<JourneyRow> =
            sqlx::query_as(&format!("SELECT {} FROM packages WHERE id = $1", JOURNEY_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(Journey::try_from).transpose()
    }

    async fn list_journeys(&self, filter: &JourneyFilter) -> StoreResult<Vec<Journey>> {
        let rows: Vec<JourneyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM packages \
             WHERE ($1::TEXT IS NULL OR category = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3::BOOLEAN IS NULL OR featured = $3) \
             ORDER BY created_at DESC",
            JOURNEY_COLUMNS
        ))
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.featured)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Journey::try_from).collect()
    }

    async fn update_journey(&self, journey: &Journey) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE packages
            SET title = $1, description = $2, price = $3, duration = $4, days = $5, nights = $6,
                location = $7, category = $8, status = $9, featured = $10, rating = $11,
                main_image_url = $12, itinerary = $13, inclusions = $14, exclusions = $15, updated_at = $16
            WHERE id = $17
            "#,
        )
        .bind(&journey.title)
        .bind(&journey.description)
        .bind(journey.price)
        .bind(&journey.duration)
        .bind(journey.days)
        .bind(journey.nights)
        .bind(&journey.location)
        .bind(journey.category.as_str())
        .bind(journey.status.as_str())
        .bind(journey.featured)
        .bind(journey.rating)
        .bind(&journey.main_image_url)
        .bind(Value::Array(journey.itinerary.clone()))
        .bind(&journey.inclusions)
        .bind(&journey.exclusions)
        .bind(journey.updated_at)
        .bind(journey.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Journey"));
        }
        Ok(())
    }

    async fn delete_journey(&self, id: Uuid) -> StoreResult<Journey> {
        let row: Option<JourneyRow> = sqlx::query_as(&format!(
            "DELETE FROM packages WHERE id = $1 RETURNING {}",
            JOURNEY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.ok_or(StoreError::NotFound("Journey"))?.try_into()
    }

    async fn count_journeys(&self, featured_only: bool) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM packages WHERE ($1 = FALSE OR featured)")
            .bind(featured_only)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

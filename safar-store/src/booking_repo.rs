use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use safar_core::repository::BookingRepository;
use safar_core::{Booking, BookingStatus, BookingWithPackage, PackageSummary, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{bad_column, db_err};

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.package_id, b.name, b.email, b.phone, b.date, b.persons, b.message, b.status, b.created_at,
           p.id AS pkg_id, p.title AS pkg_title, p.price AS pkg_price,
           p.description AS pkg_description, p.location AS pkg_location, p.duration AS pkg_duration
    FROM bookings b
    LEFT JOIN packages p ON p.id = b.package_id
"#;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    package_id: Option<Uuid>,
    name: String,
    email: String,
    phone: String,
    date: NaiveDate,
    persons: i32,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    pkg_id: Option<Uuid>,
    pkg_title: Option<String>,
    pkg_price: Option<i64>,
    pkg_description: Option<String>,
    pkg_location: Option<String>,
    pkg_duration: Option<String>,
}

impl TryFrom<BookingRow> for BookingWithPackage {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let package = match (row.pkg_id, row.pkg_title) {
            (Some(id), Some(title)) => Some(PackageSummary {
                id,
                title,
                price: row.pkg_price.unwrap_or(0),
                description: row.pkg_description.unwrap_or_default(),
                location: row.pkg_location.unwrap_or_default(),
                duration: row.pkg_duration.unwrap_or_default(),
            }),
            _ => None,
        };
        let booking = Booking {
            id: row.id,
            package_id: row.package_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            date: row.date,
            persons: row.persons,
            message: row.message,
            status: row.status.parse().map_err(bad_column)?,
            created_at: row.created_at,
        };
        Ok(BookingWithPackage::new(booking, package))
    }
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn create_booking(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, package_id, name, email, phone, date, persons, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(booking.id)
        .bind(booking.package_id)
        .bind(&booking.name)
        .bind(&booking.email)
        .bind(&booking.phone)
        .bind(booking.date)
        .bind(booking.persons)
        .bind(&booking.message)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingWithPackage>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!("{} WHERE b.id = $1", BOOKING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(BookingWithPackage::try_from).transpose()
    }

    async fn list_bookings(&self, limit: Option<i64>) -> StoreResult<Vec<BookingWithPackage>> {
        // LIMIT NULL means no limit in Postgres
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("{} ORDER BY b.created_at DESC LIMIT $1", BOOKING_SELECT))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        rows.into_iter().map(BookingWithPackage::try_from).collect()
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<()> {
        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Booking"));
        }
        Ok(())
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Booking"));
        }
        Ok(())
    }

    async fn count_bookings(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safar_core::repository::ContactRepository;
use safar_core::{Contact, ContactFilter, ContactStatus, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{bad_column, db_err};

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, status, replied_at, created_at";

pub struct StoreContactRepository {
    pool: PgPool,
}

impl StoreContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    status: String,
    replied_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = StoreError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        Ok(Contact {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            status: row.status.parse().map_err(bad_column)?,
            replied_at: row.replied_at,
            created_at: row.created_at,
        })
    }
}

/// Builds an ILIKE pattern that matches `term` literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ContactRepository for StoreContactRepository {
    async fn create_contact(&self, contact: &Contact) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, phone, subject, message, status, replied_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.status.as_str())
        .bind(contact.replied_at)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn list_contacts(&self, filter: &ContactFilter, limit: Option<i64>) -> StoreResult<Vec<Contact>> {
        let rows: Vec<ContactRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contacts \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::TEXT IS NULL OR name ILIKE $2 OR email ILIKE $2 OR subject ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3",
            CONTACT_COLUMNS
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.search_term().map(|t| like_pattern(&t)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Contact::try_from).collect()
    }

    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Contact> {
        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "UPDATE contacts \
             SET status = $1, \
                 replied_at = CASE WHEN $1 = 'replied' THEN COALESCE(replied_at, $2) ELSE replied_at END \
             WHERE id = $3 \
             RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.ok_or(StoreError::NotFound("Contact"))?.try_into()
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Contact"));
        }
        Ok(())
    }

    async fn count_contacts(&self, status: Option<ContactStatus>) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE ($1::TEXT IS NULL OR status = $1)")
            .bind(status.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("kashmir"), "%kashmir%");
    }
}

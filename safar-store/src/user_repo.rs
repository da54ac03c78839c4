use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safar_core::repository::UserRepository;
use safar_core::{Role, StoreError, StoreResult, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_err;

pub struct StoreUserRepository {
    pool: PgPool,
}

impl StoreUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role.as_deref().map(Role::parse_lenient).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, email, name, role, created_at FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (id, email, name, role, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn update_profile(&self, id: Uuid, email: &str, name: Option<&str>) -> StoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            "UPDATE users SET email = $1, name = COALESCE($2, name) WHERE id = $3 \
             RETURNING id, email, name, role, created_at",
        )
        .bind(email)
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(User::from).ok_or(StoreError::NotFound("User"))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1 FROM users LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

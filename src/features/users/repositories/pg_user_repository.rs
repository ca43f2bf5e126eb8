use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::UserRepository;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{NewUser, User};

const USER_COLUMNS: &str = "user_id, role, name, department, email, status, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    user_id: i64,
    role: String,
    name: String,
    department: Option<String>,
    email: Option<String>,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            role: row.role.into(),
            name: row.name,
            department: row.department,
            email: row.email,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY name, user_id", USER_COLUMNS);
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find(&self, user_id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (role, name, department, email, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user.role.as_str())
            .bind(&user.name)
            .bind(&user.department)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(row.into())
    }

    async fn update(&self, user: User) -> Result<Option<User>> {
        let query = format!(
            r#"
            UPDATE users
            SET role = $2, name = $3, department = $4, email = $5, status = $6, updated_at = $7
            WHERE user_id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user.user_id)
            .bind(user.role.as_str())
            .bind(&user.name)
            .bind(&user.department)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user {}: {:?}", user.user_id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(User::from))
    }

    async fn delete(&self, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

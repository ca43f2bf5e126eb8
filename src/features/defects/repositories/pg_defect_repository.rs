use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use super::DefectRepository;
use crate::core::error::{AppError, Result};
use crate::features::defects::models::{Defect, NewDefect};

const DEFECT_COLUMNS: &str = r#"
    defect_id, test_type, title, severity, priority, status, creator, assignee,
    menu_name, screen_name, screen_url, screenshot, env_info, steps_to_repro,
    action_comment, created_at, updated_at, action_start, action_end
"#;

/// Database row for the `defects` table. Enum columns hold their text labels.
#[derive(Debug, Clone, FromRow)]
struct DefectRow {
    defect_id: i64,
    test_type: Option<String>,
    title: String,
    severity: String,
    priority: String,
    status: String,
    creator: String,
    assignee: Option<String>,
    menu_name: Option<String>,
    screen_name: Option<String>,
    screen_url: Option<String>,
    screenshot: Option<String>,
    env_info: Option<String>,
    steps_to_repro: Option<String>,
    action_comment: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    action_start: Option<NaiveDate>,
    action_end: Option<NaiveDate>,
}

impl From<DefectRow> for Defect {
    fn from(row: DefectRow) -> Self {
        Self {
            defect_id: row.defect_id,
            test_type: row.test_type,
            title: row.title,
            severity: row.severity.into(),
            priority: row.priority.into(),
            status: row.status.into(),
            creator: row.creator,
            assignee: row.assignee,
            menu_name: row.menu_name,
            screen_name: row.screen_name,
            screen_url: row.screen_url,
            screenshot: row.screenshot,
            env_info: row.env_info,
            steps_to_repro: row.steps_to_repro,
            action_comment: row.action_comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
            action_start: row.action_start,
            action_end: row.action_end,
        }
    }
}

/// PostgreSQL-backed defect store
pub struct PgDefectRepository {
    pool: PgPool,
}

impl PgDefectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DefectRepository for PgDefectRepository {
    async fn list(&self) -> Result<Vec<Defect>> {
        let query = format!(
            "SELECT {} FROM defects ORDER BY created_at DESC NULLS LAST, defect_id DESC",
            DEFECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, DefectRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list defects: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Defect::from).collect())
    }

    async fn find(&self, defect_id: i64) -> Result<Option<Defect>> {
        let query = format!("SELECT {} FROM defects WHERE defect_id = $1", DEFECT_COLUMNS);
        let row = sqlx::query_as::<_, DefectRow>(&query)
            .bind(defect_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get defect {}: {:?}", defect_id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(Defect::from))
    }

    async fn insert(&self, defect: NewDefect) -> Result<Defect> {
        let query = format!(
            r#"
            INSERT INTO defects (
                test_type, title, severity, priority, status, creator, assignee,
                menu_name, screen_name, screen_url, screenshot, env_info, steps_to_repro,
                action_comment, created_at, action_start, action_end
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            DEFECT_COLUMNS
        );
        let row = sqlx::query_as::<_, DefectRow>(&query)
            .bind(&defect.test_type)
            .bind(&defect.title)
            .bind(defect.severity.as_str())
            .bind(defect.priority.as_str())
            .bind(defect.status.as_str())
            .bind(&defect.creator)
            .bind(&defect.assignee)
            .bind(&defect.menu_name)
            .bind(&defect.screen_name)
            .bind(&defect.screen_url)
            .bind(&defect.screenshot)
            .bind(&defect.env_info)
            .bind(&defect.steps_to_repro)
            .bind(&defect.action_comment)
            .bind(defect.created_at)
            .bind(defect.action_start)
            .bind(defect.action_end)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create defect: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(row.into())
    }

    async fn update(&self, defect: Defect) -> Result<Option<Defect>> {
        let query = format!(
            r#"
            UPDATE defects SET
                test_type = $2, title = $3, severity = $4, priority = $5, status = $6,
                creator = $7, assignee = $8, menu_name = $9, screen_name = $10,
                screen_url = $11, screenshot = $12, env_info = $13, steps_to_repro = $14,
                action_comment = $15, updated_at = $16, action_start = $17, action_end = $18
            WHERE defect_id = $1
            RETURNING {}
            "#,
            DEFECT_COLUMNS
        );
        let row = sqlx::query_as::<_, DefectRow>(&query)
            .bind(defect.defect_id)
            .bind(&defect.test_type)
            .bind(&defect.title)
            .bind(defect.severity.as_str())
            .bind(defect.priority.as_str())
            .bind(defect.status.as_str())
            .bind(&defect.creator)
            .bind(&defect.assignee)
            .bind(&defect.menu_name)
            .bind(&defect.screen_name)
            .bind(&defect.screen_url)
            .bind(&defect.screenshot)
            .bind(&defect.env_info)
            .bind(&defect.steps_to_repro)
            .bind(&defect.action_comment)
            .bind(defect.updated_at)
            .bind(defect.action_start)
            .bind(defect.action_end)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update defect {}: {:?}", defect.defect_id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(Defect::from))
    }

    async fn delete(&self, defect_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM defects WHERE defect_id = $1")
            .bind(defect_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete defect {}: {:?}", defect_id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

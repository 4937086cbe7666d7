use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Notice,
    error::{AppError, Result},
    repository::NoticeRepository,
};

#[derive(FromRow)]
struct NoticeRow {
    id: String,
    title: String,
    content: String,
    batch: String,
    priority: String,
    created_by: String,
    created_by_name: String,
    created_at: NaiveDateTime,
}

pub struct SqliteNoticeRepository {
    pool: SqlitePool,
}

impl SqliteNoticeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_notice(row: NoticeRow) -> Result<Notice> {
        Ok(Notice {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            content: row.content,
            batch: row.batch,
            priority: row.priority,
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_by_name: row.created_by_name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl NoticeRepository for SqliteNoticeRepository {
    async fn create(&self, notice: Notice) -> Result<Notice> {
        sqlx::query(
            r#"
            INSERT INTO notices (
                id, title, content, batch, priority, created_by,
                created_by_name, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(notice.id.to_string())
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(&notice.batch)
        .bind(&notice.priority)
        .bind(notice.created_by.to_string())
        .bind(&notice.created_by_name)
        .bind(notice.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(notice)
    }

    async fn list_for_batch(&self, batch: &str, limit: i64) -> Result<Vec<Notice>> {
        let rows = sqlx::query_as::<_, NoticeRow>(
            r#"
            SELECT id, title, content, batch, priority, created_by,
                   created_by_name, created_at
            FROM notices
            WHERE batch IN (?, 'all')
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(batch)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_notice).collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Notice>> {
        let rows = sqlx::query_as::<_, NoticeRow>(
            r#"
            SELECT id, title, content, batch, priority, created_by,
                   created_by_name, created_at
            FROM notices
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_notice).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM notices WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

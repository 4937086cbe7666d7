use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    error::{AppError, Result},
    repository::{ChatEggState, ChatSessionRepository},
};

#[derive(FromRow)]
struct ChatSessionRow {
    easter_egg_active: i64,
    easter_egg_stage: i64,
    updated_at: NaiveDateTime,
}

pub struct SqliteChatSessionRepository {
    pool: SqlitePool,
}

impl SqliteChatSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatSessionRepository for SqliteChatSessionRepository {
    async fn get(&self, session_id: &str) -> Result<Option<ChatEggState>> {
        let row = sqlx::query_as::<_, ChatSessionRow>(
            r#"
            SELECT easter_egg_active, easter_egg_stage, updated_at
            FROM chat_sessions
            WHERE id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| ChatEggState {
            active: r.easter_egg_active != 0,
            stage: r.easter_egg_stage,
            updated_at: DateTime::from_naive_utc_and_offset(r.updated_at, Utc),
        }))
    }

    async fn set(&self, session_id: &str, active: bool, stage: i64) -> Result<()> {
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, easter_egg_active, easter_egg_stage, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                easter_egg_active = excluded.easter_egg_active,
                easter_egg_stage = excluded.easter_egg_stage,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(active as i64)
        .bind(stage)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Enquiry, EnquiryStatus},
    error::{AppError, Result},
    repository::EnquiryRepository,
};

#[derive(FromRow)]
struct EnquiryRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    batch: Option<String>,
    message: String,
    status: String,
    created_at: NaiveDateTime,
}

pub struct SqliteEnquiryRepository {
    pool: SqlitePool,
}

impl SqliteEnquiryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_enquiry(row: EnquiryRow) -> Result<Enquiry> {
        Ok(Enquiry {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            phone: row.phone,
            batch: row.batch,
            message: row.message,
            status: match row.status.as_str() {
                "new" => EnquiryStatus::New,
                "seen" => EnquiryStatus::Seen,
                other => {
                    return Err(AppError::Database(format!("Invalid enquiry status: {}", other)))
                }
            },
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl EnquiryRepository for SqliteEnquiryRepository {
    async fn create(&self, enquiry: Enquiry) -> Result<Enquiry> {
        sqlx::query(
            r#"
            INSERT INTO enquiries (id, name, email, phone, batch, message, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 'new', ?)
            "#,
        )
        .bind(enquiry.id.to_string())
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.batch)
        .bind(&enquiry.message)
        .bind(enquiry.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(enquiry)
    }

    async fn list_all(&self) -> Result<Vec<Enquiry>> {
        let rows = sqlx::query_as::<_, EnquiryRow>(
            r#"
            SELECT id, name, email, phone, batch, message, status, created_at
            FROM enquiries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_enquiry).collect()
    }

    async fn mark_all_seen(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE enquiries SET status = 'seen' WHERE status = 'new'")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn count_new(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enquiries WHERE status = 'new'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM enquiries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Enquiry not found".to_string()));
        }

        Ok(())
    }
}

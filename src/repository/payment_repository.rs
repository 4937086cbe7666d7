use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{time, Payment, PaymentStatus, Plan},
    error::{AppError, Result},
    repository::PaymentRepository,
};

// Timestamp columns are dynamically typed in SQLite; rows imported from the
// previous system hold epoch numbers and naive datetimes alongside RFC 3339
// text. Every query CASTs them to text and the row mapper coerces.
#[derive(FromRow)]
struct PaymentRow {
    id: String,
    student_id: String,
    plan: String,
    amount: i64,
    status: String,
    payment_method: Option<String>,
    notes: Option<String>,
    offline: i64,
    created_at: String,
    submitted_at: Option<String>,
    verified_at: Option<String>,
    rejected_at: Option<String>,
    expires_at: Option<String>,
    rejection_reason: Option<String>,
}

const PAYMENT_COLUMNS: &str = r#"
    id, student_id, plan, amount, status, payment_method, notes, offline,
    CAST(created_at AS TEXT) AS created_at,
    CAST(submitted_at AS TEXT) AS submitted_at,
    CAST(verified_at AS TEXT) AS verified_at,
    CAST(rejected_at AS TEXT) AS rejected_at,
    CAST(expires_at AS TEXT) AS expires_at,
    rejection_reason
"#;

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            student_id: Uuid::parse_str(&row.student_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            // Unrecognized stored plans fall back to the monthly term.
            plan: Plan::parse(&row.plan).unwrap_or(Plan::OneMonth),
            amount: row.amount,
            status: Self::parse_payment_status(&row.status)?,
            payment_method: row.payment_method,
            notes: row.notes,
            offline: row.offline != 0,
            created_at: time::coerce_str(&row.created_at).ok_or_else(|| {
                AppError::Database(format!("Unreadable created_at: {}", row.created_at))
            })?,
            submitted_at: row.submitted_at.as_deref().and_then(time::coerce_str),
            verified_at: row.verified_at.as_deref().and_then(time::coerce_str),
            rejected_at: row.rejected_at.as_deref().and_then(time::coerce_str),
            // Malformed expiry values read as absent; the fee calculator
            // skips such records.
            expires_at: row.expires_at.as_deref().and_then(time::coerce_str),
            rejection_reason: row.rejection_reason,
        })
    }

    fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "submitted" => Ok(PaymentStatus::Submitted),
            "verified" => Ok(PaymentStatus::Verified),
            "rejected" => Ok(PaymentStatus::Rejected),
            _ => Err(AppError::Database(format!("Invalid payment status: {}", s))),
        }
    }

    fn payment_status_to_str(status: &PaymentStatus) -> &'static str {
        match status {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Submitted => "submitted",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        let id_str = payment.id.to_string();
        let student_id_str = payment.student_id.to_string();
        let status_str = Self::payment_status_to_str(&payment.status);

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, student_id, plan, amount, status, payment_method, notes,
                offline, created_at, submitted_at, verified_at, rejected_at,
                expires_at, rejection_reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&student_id_str)
        .bind(payment.plan.as_str())
        .bind(payment.amount)
        .bind(status_str)
        .bind(&payment.payment_method)
        .bind(&payment.notes)
        .bind(payment.offline as i64)
        .bind(payment.created_at.to_rfc3339())
        .bind(payment.submitted_at.map(|dt| dt.to_rfc3339()))
        .bind(payment.verified_at.map(|dt| dt.to_rfc3339()))
        .bind(payment.rejected_at.map(|dt| dt.to_rfc3339()))
        .bind(payment.expires_at.map(|dt| dt.to_rfc3339()))
        .bind(&payment.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(payment.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created payment".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<Payment>> {
        let student_id_str = student_id.to_string();
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {} FROM payments
            WHERE student_id = ?
            ORDER BY created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(student_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn find_open_by_student(&self, student_id: Uuid) -> Result<Option<Payment>> {
        let student_id_str = student_id.to_string();
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {} FROM payments
            WHERE student_id = ? AND status IN ('pending', 'submitted')
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(student_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn find_verified_by_student(&self, student_id: Uuid) -> Result<Vec<Payment>> {
        let student_id_str = student_id.to_string();
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {} FROM payments
            WHERE student_id = ? AND status = 'verified'
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(student_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn list_all(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64> {
        let status_str = Self::payment_status_to_str(&status);
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE status = ?")
                .bind(status_str)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn mark_submitted(&self, id: Uuid, at: DateTime<Utc>) -> Result<Payment> {
        let id_str = id.to_string();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'submitted', submitted_at = ?
            WHERE id = ?
            "#,
        )
        .bind(at.to_rfc3339())
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated payment".to_string()))
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Payment> {
        let id_str = id.to_string();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'verified', verified_at = ?, expires_at = ?
            WHERE id = ?
            "#,
        )
        .bind(at.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated payment".to_string()))
    }

    async fn mark_rejected(&self, id: Uuid, at: DateTime<Utc>, reason: &str) -> Result<Payment> {
        let id_str = id.to_string();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'rejected', rejected_at = ?, rejection_reason = ?
            WHERE id = ?
            "#,
        )
        .bind(at.to_rfc3339())
        .bind(reason)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated payment".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

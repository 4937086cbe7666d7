use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Account, AccountStatus, ProfileUpdateRequest, Role},
    error::{AppError, Result},
    repository::{AccountRepository, CreateAccount},
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
struct AccountRow {
    id: String,
    email: String,
    name: String,
    phone: Option<String>,
    age: Option<i64>,
    parent_name: Option<String>,
    role: String,
    status: String,
    batch: Option<String>,
    fees_paid: i64,
    payment_verified: i64,
    rating: i64,
    registration_date: NaiveDateTime,
    batch_updated_at: Option<NaiveDateTime>,
    status_updated_at: Option<NaiveDateTime>,
}

const ACCOUNT_COLUMNS: &str = r#"
    id, email, name, phone, age, parent_name, role, status, batch,
    fees_paid, payment_verified, rating, registration_date,
    batch_updated_at, status_updated_at
"#;

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: AccountRow) -> Result<Account> {
        Ok(Account {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.email,
            name: row.name,
            phone: row.phone,
            age: row.age,
            parent_name: row.parent_name,
            role: Self::parse_role(&row.role)?,
            status: Self::parse_status(&row.status)?,
            batch: row.batch,
            fees_paid: row.fees_paid != 0,
            payment_verified: row.payment_verified != 0,
            rating: row.rating,
            registration_date: DateTime::from_naive_utc_and_offset(row.registration_date, Utc),
            batch_updated_at: row
                .batch_updated_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            status_updated_at: row
                .status_updated_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
        })
    }

    fn parse_role(s: &str) -> Result<Role> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::Database(format!("Invalid role: {}", s))),
        }
    }

    fn role_to_str(role: &Role) -> &'static str {
        match role {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    fn parse_status(s: &str) -> Result<AccountStatus> {
        match s {
            "new" => Ok(AccountStatus::New),
            "active" => Ok(AccountStatus::Active),
            "disabled" => Ok(AccountStatus::Disabled),
            _ => Err(AppError::Database(format!("Invalid account status: {}", s))),
        }
    }

    fn status_to_str(status: &AccountStatus) -> &'static str {
        match status {
            AccountStatus::New => "new",
            AccountStatus::Active => "active",
            AccountStatus::Disabled => "disabled",
        }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: CreateAccount) -> Result<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let role_str = Self::role_to_str(&account.role);
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, name, phone, age, parent_name,
                role, status, batch, fees_paid, payment_verified, rating,
                registration_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'new', NULL, 0, 0, 0, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(&account.phone)
        .bind(account.age)
        .bind(&account.parent_name)
        .bind(role_str)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created account".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_account(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_account(r)?)),
            None => Ok(None),
        }
    }

    async fn password_hash_by_email(&self, email: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(hash)
    }

    async fn list_students(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {} FROM users
            WHERE role = 'student'
            ORDER BY registration_date DESC
            "#,
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_account).collect()
    }

    async fn list_students_by_status(&self, status: AccountStatus) -> Result<Vec<Account>> {
        let status_str = Self::status_to_str(&status);
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {} FROM users
            WHERE role = 'student' AND status = ?
            ORDER BY registration_date DESC
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(status_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_account).collect()
    }

    async fn assign_batch(&self, id: Uuid, batch: &str, at: DateTime<Utc>) -> Result<Account> {
        let id_str = id.to_string();
        let at_naive = at.naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET batch = ?,
                batch_updated_at = ?,
                status = 'active',
                status_updated_at = ?
            WHERE id = ? AND role = 'student'
            "#,
        )
        .bind(batch)
        .bind(at_naive)
        .bind(at_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated account".to_string()))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
        at: DateTime<Utc>,
    ) -> Result<Account> {
        let id_str = id.to_string();
        let status_str = Self::status_to_str(&status);
        let at_naive = at.naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = ?, status_updated_at = ?
            WHERE id = ? AND role = 'student'
            "#,
        )
        .bind(status_str)
        .bind(at_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated account".to_string()))
    }

    async fn set_rating(&self, id: Uuid, rating: i64) -> Result<Account> {
        let id_str = id.to_string();

        let result = sqlx::query("UPDATE users SET rating = ? WHERE id = ? AND role = 'student'")
            .bind(rating)
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated account".to_string()))
    }

    async fn mark_fees_submitted(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        sqlx::query("UPDATE users SET fees_paid = 1, payment_verified = 0 WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_payment_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let id_str = id.to_string();
        let at_naive = at.naive_utc();

        sqlx::query(
            r#"
            UPDATE users
            SET fees_paid = 1,
                payment_verified = 1,
                status = 'active',
                status_updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(at_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdateRequest,
        at: DateTime<Utc>,
    ) -> Result<Account> {
        let id_str = id.to_string();
        let at_naive = at.naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET age = COALESCE(?, age),
                parent_name = COALESCE(?, parent_name),
                phone = COALESCE(?, phone),
                profile_updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.age)
        .bind(&update.parent_name)
        .bind(&update.phone)
        .bind(at_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated account".to_string()))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One row of the `users` table. Students and admins share the table; `role`
/// discriminates, and the student-only fields stay at their defaults for
/// admin rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_name: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub batch: Option<String>,
    /// Best-effort cache written by the payment handlers; the fee status
    /// calculator is the source of truth and this flag is never flipped back
    /// when coverage lapses.
    pub fees_paid: bool,
    pub payment_verified: bool,
    pub rating: i64,
    pub registration_date: DateTime<Utc>,
    pub batch_updated_at: Option<DateTime<Utc>>,
    pub status_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    New,
    Active,
    Disabled,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(range(min = 5, max = 100))]
    pub age: Option<i64>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(range(min = 5, max = 100))]
    pub age: Option<i64>,
    #[validate(length(max = 100))]
    pub parent_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

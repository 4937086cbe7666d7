use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod account_repository;
pub mod chat_session_repository;
pub mod enquiry_repository;
pub mod notice_repository;
pub mod payment_repository;
pub mod study_material_repository;

pub use account_repository::SqliteAccountRepository;
pub use chat_session_repository::SqliteChatSessionRepository;
pub use enquiry_repository::SqliteEnquiryRepository;
pub use notice_repository::SqliteNoticeRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use study_material_repository::SqliteStudyMaterialRepository;

/// Insert shape for the `users` table; the password is hashed by the caller.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_name: Option<String>,
    pub role: Role,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: CreateAccount) -> Result<Account>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn password_hash_by_email(&self, email: &str) -> Result<Option<String>>;
    async fn list_students(&self) -> Result<Vec<Account>>;
    async fn list_students_by_status(&self, status: AccountStatus) -> Result<Vec<Account>>;
    /// Batch assignment and activation are one update; there is no
    /// "active with no batch" state reachable through this path.
    async fn assign_batch(&self, id: Uuid, batch: &str, at: DateTime<Utc>) -> Result<Account>;
    async fn set_status(&self, id: Uuid, status: AccountStatus, at: DateTime<Utc>)
        -> Result<Account>;
    async fn set_rating(&self, id: Uuid, rating: i64) -> Result<Account>;
    /// Submit-side cache write: fees_paid on, payment_verified off.
    async fn mark_fees_submitted(&self, id: Uuid) -> Result<()>;
    /// Verify-side write: both caches on, account activated.
    async fn mark_payment_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;
    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdateRequest,
        at: DateTime<Utc>,
    ) -> Result<Account>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<Payment>>;
    async fn find_open_by_student(&self, student_id: Uuid) -> Result<Option<Payment>>;
    async fn find_verified_by_student(&self, student_id: Uuid) -> Result<Vec<Payment>>;
    async fn list_all(&self) -> Result<Vec<Payment>>;
    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64>;
    async fn mark_submitted(&self, id: Uuid, at: DateTime<Utc>) -> Result<Payment>;
    async fn mark_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Payment>;
    async fn mark_rejected(&self, id: Uuid, at: DateTime<Utc>, reason: &str) -> Result<Payment>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn create(&self, notice: Notice) -> Result<Notice>;
    async fn list_for_batch(&self, batch: &str, limit: i64) -> Result<Vec<Notice>>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Notice>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait StudyMaterialRepository: Send + Sync {
    async fn create(&self, material: StudyMaterial) -> Result<StudyMaterial>;
    async fn list_for_batch(&self, batch: &str, limit: i64) -> Result<Vec<StudyMaterial>>;
    async fn list_assignments_for_batch(&self, batch: &str) -> Result<Vec<StudyMaterial>>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<StudyMaterial>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    async fn create(&self, enquiry: Enquiry) -> Result<Enquiry>;
    async fn list_all(&self) -> Result<Vec<Enquiry>>;
    async fn mark_all_seen(&self) -> Result<u64>;
    async fn count_new(&self) -> Result<i64>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Easter-egg progress for one chat session subject.
#[derive(Debug, Clone, Copy)]
pub struct ChatEggState {
    pub active: bool,
    pub stage: i64,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<ChatEggState>>;
    async fn set(&self, session_id: &str, active: bool, stage: i64) -> Result<()>;
}

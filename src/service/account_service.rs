use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthService,
    domain::{Account, AccountStatus, ProfileUpdateRequest, RegisterRequest, Role},
    error::{AppError, Result},
    repository::{AccountRepository, CreateAccount},
};

/// Student lifecycle: `new -> active <-> disabled`. Activation happens only
/// through batch assignment; there is no way back to `new`.
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Account> {
        request.validate()?;

        if let Some(phone) = &request.phone {
            validate_phone(phone)?;
        }

        if self.accounts.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = AuthService::hash_password(&request.password).await?;

        self.accounts
            .create(CreateAccount {
                email: request.email,
                password_hash,
                name: request.name,
                phone: request.phone,
                age: request.age,
                parent_name: request.parent_name,
                role: Role::Student,
            })
            .await
    }

    /// Assigning a batch activates the student in the same update.
    /// Reassigning while already active keeps the status active.
    pub async fn assign_batch(
        &self,
        student_id: Uuid,
        batch: &str,
        now: DateTime<Utc>,
    ) -> Result<Account> {
        let batch = batch.trim();
        if batch.is_empty() {
            return Err(AppError::BadRequest("Batch name is required".to_string()));
        }

        self.accounts.assign_batch(student_id, batch, now).await
    }

    /// Admin toggle between active and disabled; independent of payment and
    /// batch state.
    pub async fn set_status(
        &self,
        student_id: Uuid,
        status: AccountStatus,
        now: DateTime<Utc>,
    ) -> Result<Account> {
        if status == AccountStatus::New {
            return Err(AppError::BadRequest(
                "Status can only be set to active or disabled".to_string(),
            ));
        }

        self.accounts.set_status(student_id, status, now).await
    }

    pub async fn set_rating(&self, student_id: Uuid, rating: i64) -> Result<Account> {
        if !(0..=3000).contains(&rating) {
            return Err(AppError::BadRequest("Invalid rating".to_string()));
        }

        self.accounts.set_rating(student_id, rating).await
    }

    pub async fn update_profile(
        &self,
        student_id: Uuid,
        update: ProfileUpdateRequest,
        now: DateTime<Utc>,
    ) -> Result<Account> {
        update.validate()?;

        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }

        self.accounts.update_profile(student_id, update, now).await
    }
}

fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "Invalid phone number. Must be 10 digits.".to_string(),
        ));
    }
    Ok(())
}

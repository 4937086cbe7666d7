use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub batch: Option<String>,
    pub message: String,
    pub status: EnquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// New enquiries flip to Seen the first time an admin lists them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    New,
    Seen,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEnquiryRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub batch: Option<String>,
    #[validate(length(min = 5))]
    pub message: String,
}

impl CreateEnquiryRequest {
    /// Phone numbers are accepted with separators but must contain exactly
    /// ten digits.
    pub fn phone_digits(&self) -> Option<String> {
        let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 10 {
            Some(digits)
        } else {
            None
        }
    }
}

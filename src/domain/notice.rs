use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Target batch name, or "all" for every batch.
    pub batch: String,
    pub priority: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default = "default_batch")]
    pub batch: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_batch() -> String {
    "all".to_string()
}

fn default_priority() -> String {
    "normal".to_string()
}

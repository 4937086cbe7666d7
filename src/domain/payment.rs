use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub plan: Plan,
    pub amount: i64,
    pub status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub offline: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// Set once at verification time and never rewritten; a later verified
    /// payment carries its own, later expiry instead.
    pub expires_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// Fee tier. Price and coverage duration are fixed per tier; coverage uses
/// calendar months, not fixed day counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Plan {
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl Plan {
    pub fn parse(s: &str) -> Option<Plan> {
        match s {
            "1month" => Some(Plan::OneMonth),
            "3months" => Some(Plan::ThreeMonths),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::OneMonth => "1month",
            Plan::ThreeMonths => "3months",
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            Plan::OneMonth => 3000,
            Plan::ThreeMonths => 7500,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Plan::OneMonth => 1,
            Plan::ThreeMonths => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Submitted,
    Verified,
    Rejected,
}

impl PaymentStatus {
    /// Open payments are awaiting resolution; a student may hold at most one.
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Submitted)
    }
}

/// Derived paid/unpaid determination for a student at a reference time.
#[derive(Debug, Clone, Serialize)]
pub struct FeeStatus {
    pub is_paid: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub days_remaining: i64,
}

impl FeeStatus {
    pub fn unpaid() -> Self {
        Self {
            is_paid: false,
            expires_at: None,
            days_remaining: 0,
        }
    }
}

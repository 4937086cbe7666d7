use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentStatus, Plan},
    error::{AppError, Result},
    repository::{AccountRepository, PaymentRepository},
    service::fee_service::FeeService,
};

/// Payment lifecycle: `pending -> submitted -> {verified | rejected}`.
/// Callers supply the reference time so verification and extension math are
/// deterministic.
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    accounts: Arc<dyn AccountRepository>,
    fees: Arc<FeeService>,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        accounts: Arc<dyn AccountRepository>,
        fees: Arc<FeeService>,
    ) -> Self {
        Self {
            payments,
            accounts,
            fees,
        }
    }

    /// Creates a pending payment for the plan. At most one open payment may
    /// exist per student: if one does, it is returned instead of inserting a
    /// duplicate.
    pub async fn initiate(
        &self,
        student_id: Uuid,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        if let Some(open) = self.payments.find_open_by_student(student_id).await? {
            return Ok(open);
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            student_id,
            plan,
            amount: plan.amount(),
            status: PaymentStatus::Pending,
            payment_method: None,
            notes: Some("Send the transfer screenshot on WhatsApp for verification".to_string()),
            offline: false,
            created_at: now,
            submitted_at: None,
            verified_at: None,
            rejected_at: None,
            expires_at: None,
            rejection_reason: None,
        };

        self.payments.create(payment).await
    }

    /// Student marks the transfer as sent. Flips the account's `fees_paid`
    /// cache on; `payment_verified` stays off until an admin verifies.
    pub async fn mark_sent(
        &self,
        student_id: Uuid,
        payment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.student_id != student_id {
            return Err(AppError::Forbidden);
        }

        if !payment.status.is_open() {
            return Err(AppError::Conflict("Payment already resolved".to_string()));
        }

        let updated = self.payments.mark_submitted(payment_id, now).await?;
        self.accounts.mark_fees_submitted(student_id).await?;

        Ok(updated)
    }

    /// Admin confirms the payment was received. A student still inside a paid
    /// term gets the new term appended to the current expiry; a lapsed or
    /// never-paid student starts counting from `now`. Extension uses calendar
    /// months: Jan 31 + 1 month lands on the last day of February.
    pub async fn verify(&self, payment_id: Uuid, now: DateTime<Utc>) -> Result<Payment> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        // Verifying twice would extend coverage twice.
        if payment.status == PaymentStatus::Verified {
            return Err(AppError::Conflict("Payment already verified".to_string()));
        }

        let current = self.fees.fee_status(payment.student_id, now).await;
        let base_date = match current.expires_at {
            Some(expiry) if expiry > now => expiry,
            _ => now,
        };
        let new_expiry = add_months(base_date, payment.plan.months());

        let updated = self.payments.mark_verified(payment_id, now, new_expiry).await?;
        self.accounts
            .mark_payment_verified(payment.student_id, now)
            .await?;

        Ok(updated)
    }

    /// Admin rejects with a reason. The account's cached flags are untouched.
    pub async fn reject(
        &self,
        payment_id: Uuid,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status == PaymentStatus::Verified {
            return Err(AppError::Conflict("Payment already verified".to_string()));
        }

        self.payments.mark_rejected(payment.id, now, reason).await
    }

    /// Admin records a payment taken outside the site (cash, direct
    /// transfer): create and verify collapsed into one step, with the same
    /// extension rule as [`Self::verify`]. Returns the payment and whether it
    /// extended a still-active term.
    pub async fn record_offline(
        &self,
        student_id: Uuid,
        plan: Plan,
        payment_method: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Payment, bool)> {
        self.accounts
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let current = self.fees.fee_status(student_id, now).await;
        let (base_date, extended) = match current.expires_at {
            Some(expiry) if expiry > now => (expiry, true),
            _ => (now, false),
        };
        let expires_at = add_months(base_date, plan.months());

        let payment = Payment {
            id: Uuid::new_v4(),
            student_id,
            plan,
            amount: plan.amount(),
            status: PaymentStatus::Verified,
            payment_method: Some(payment_method.to_string()),
            notes: notes.or_else(|| Some(format!("Offline payment ({})", payment_method))),
            offline: true,
            created_at: now,
            submitted_at: None,
            verified_at: Some(now),
            rejected_at: None,
            expires_at: Some(expires_at),
            rejection_reason: None,
        };

        let created = self.payments.create(payment).await?;
        self.accounts.mark_payment_verified(student_id, now).await?;

        Ok((created, extended))
    }
}

fn add_months(base: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    // None only on date overflow, far past any real expiry.
    base.checked_add_months(Months::new(months)).unwrap_or(base)
}

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{domain::FeeStatus, repository::PaymentRepository};

/// Payment records are kept for one year, then pruned.
const RETENTION_DAYS: i64 = 365;

/// Derives paid/unpaid state from verified payments. The stored
/// `fees_paid` / `payment_verified` flags on the account are display caches;
/// every decision goes through this service.
pub struct FeeService {
    payments: Arc<dyn PaymentRepository>,
}

impl FeeService {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// Latest verified expiry wins; payments never stack here. Multiple
    /// verified terms only chain because verification computed each
    /// `expires_at` as an extension of the then-current expiry.
    ///
    /// This gates rendering on many pages, so it never returns an error:
    /// backend failures degrade to unpaid.
    pub async fn fee_status(&self, student_id: Uuid, reference_time: DateTime<Utc>) -> FeeStatus {
        let payments = match self.payments.find_verified_by_student(student_id).await {
            Ok(payments) => payments,
            Err(e) => {
                tracing::warn!(%student_id, "fee status lookup failed, reporting unpaid: {}", e);
                return FeeStatus::unpaid();
            }
        };

        // Records whose expiry failed to coerce carry None and drop out here.
        let latest_expiry = payments.iter().filter_map(|p| p.expires_at).max();

        match latest_expiry {
            Some(expiry) if expiry > reference_time => FeeStatus {
                is_paid: true,
                expires_at: Some(expiry),
                days_remaining: (expiry - reference_time).num_days(),
            },
            other => FeeStatus {
                is_paid: false,
                expires_at: other,
                days_remaining: 0,
            },
        }
    }

    /// Prunes payment records older than a year, any status. Invoked
    /// opportunistically before payment pages are served, so failures are
    /// logged and swallowed; a partial sweep just leaves work for next time.
    pub async fn sweep_old_payments(&self, reference_time: DateTime<Utc>) -> u64 {
        let cutoff = reference_time - Duration::days(RETENTION_DAYS);

        let payments = match self.payments.list_all().await {
            Ok(payments) => payments,
            Err(e) => {
                tracing::warn!("retention sweep skipped, listing failed: {}", e);
                return 0;
            }
        };

        let mut deleted = 0u64;
        for payment in payments.iter().filter(|p| p.created_at < cutoff) {
            match self.payments.delete(payment.id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(payment_id = %payment.id, "sweep delete failed: {}", e);
                }
            }
        }

        if deleted > 0 {
            tracing::info!("retention sweep deleted {} old payment records", deleted);
        }
        deleted
    }
}

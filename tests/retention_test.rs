use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use rookery::{
    domain::{Payment, PaymentStatus, Plan},
    repository::{PaymentRepository, SqlitePaymentRepository},
    service::FeeService,
};

async fn setup() -> anyhow::Result<(Arc<SqlitePaymentRepository>, FeeService)> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = Arc::new(SqlitePaymentRepository::new(pool.clone()));
    let fees = FeeService::new(repo.clone());

    Ok((repo, fees))
}

async fn insert_payment(
    repo: &SqlitePaymentRepository,
    student_id: Uuid,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
) -> anyhow::Result<Payment> {
    Ok(repo
        .create(Payment {
            id: Uuid::new_v4(),
            student_id,
            plan: Plan::OneMonth,
            amount: Plan::OneMonth.amount(),
            status,
            payment_method: None,
            notes: None,
            offline: false,
            created_at,
            submitted_at: None,
            verified_at: None,
            rejected_at: None,
            expires_at: None,
            rejection_reason: None,
        })
        .await?)
}

#[tokio::test]
async fn sweep_deletes_across_the_one_year_boundary() -> anyhow::Result<()> {
    let (repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc::now();

    let stale = insert_payment(
        &repo,
        student_id,
        PaymentStatus::Rejected,
        now - Duration::days(366),
    )
    .await?;
    let fresh = insert_payment(
        &repo,
        student_id,
        PaymentStatus::Pending,
        now - Duration::days(364),
    )
    .await?;

    let deleted = fees.sweep_old_payments(now).await;
    assert_eq!(deleted, 1);

    assert!(repo.find_by_id(stale.id).await?.is_none());
    assert!(repo.find_by_id(fresh.id).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn sweep_ignores_status() -> anyhow::Result<()> {
    let (repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc::now();
    let old = now - Duration::days(400);

    // Even a verified payment is pruned once it ages out.
    for status in [
        PaymentStatus::Pending,
        PaymentStatus::Submitted,
        PaymentStatus::Verified,
        PaymentStatus::Rejected,
    ] {
        insert_payment(&repo, student_id, status, old).await?;
    }

    let deleted = fees.sweep_old_payments(now).await;
    assert_eq!(deleted, 4);
    assert!(repo.find_by_student(student_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn sweep_with_nothing_to_do_deletes_nothing() -> anyhow::Result<()> {
    let (repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc::now();

    insert_payment(&repo, student_id, PaymentStatus::Pending, now - Duration::days(10)).await?;

    assert_eq!(fees.sweep_old_payments(now).await, 0);
    assert_eq!(repo.find_by_student(student_id).await?.len(), 1);

    Ok(())
}

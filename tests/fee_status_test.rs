use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use rookery::{
    domain::{Payment, PaymentStatus, Plan},
    repository::{PaymentRepository, SqlitePaymentRepository},
    service::FeeService,
};

async fn setup() -> anyhow::Result<(SqlitePool, Arc<SqlitePaymentRepository>, FeeService)> {
    // SQLite in-memory databases are per-connection; a single-connection pool
    // keeps every query on the same database.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = Arc::new(SqlitePaymentRepository::new(pool.clone()));
    let fees = FeeService::new(repo.clone());

    Ok((pool, repo, fees))
}

fn verified_payment(
    student_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        student_id,
        plan: Plan::OneMonth,
        amount: Plan::OneMonth.amount(),
        status: PaymentStatus::Verified,
        payment_method: None,
        notes: None,
        offline: false,
        created_at,
        submitted_at: None,
        verified_at: Some(created_at),
        rejected_at: None,
        expires_at: Some(expires_at),
        rejection_reason: None,
    }
}

#[tokio::test]
async fn latest_expiry_wins_regardless_of_insertion_order() -> anyhow::Result<()> {
    let (_pool, repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    // Insert out of chronological order; only the maximum matters.
    let expiries = [
        now + Duration::days(10),
        now + Duration::days(40),
        now + Duration::days(25),
    ];
    for expiry in expiries {
        repo.create(verified_payment(student_id, now - Duration::days(30), expiry))
            .await?;
    }

    let status = fees.fee_status(student_id, now).await;
    assert!(status.is_paid);
    assert_eq!(status.expires_at, Some(now + Duration::days(40)));
    assert_eq!(status.days_remaining, 40);

    Ok(())
}

#[tokio::test]
async fn all_expiries_in_the_past_reads_unpaid() -> anyhow::Result<()> {
    let (_pool, repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    repo.create(verified_payment(
        student_id,
        now - Duration::days(90),
        now - Duration::days(60),
    ))
    .await?;

    let status = fees.fee_status(student_id, now).await;
    assert!(!status.is_paid);
    // The stale expiry is still reported for display.
    assert_eq!(status.expires_at, Some(now - Duration::days(60)));
    assert_eq!(status.days_remaining, 0);

    Ok(())
}

#[tokio::test]
async fn expiry_equal_to_reference_time_is_not_paid() -> anyhow::Result<()> {
    let (_pool, repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    repo.create(verified_payment(student_id, now - Duration::days(30), now))
        .await?;

    // Strictly-after comparison: expiring right now means lapsed.
    let status = fees.fee_status(student_id, now).await;
    assert!(!status.is_paid);

    Ok(())
}

#[tokio::test]
async fn days_remaining_truncates_partial_days() -> anyhow::Result<()> {
    let (_pool, repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    repo.create(verified_payment(
        student_id,
        now - Duration::days(10),
        now + Duration::days(3) + Duration::hours(20),
    ))
    .await?;

    let status = fees.fee_status(student_id, now).await;
    assert_eq!(status.days_remaining, 3);

    Ok(())
}

#[tokio::test]
async fn only_verified_payments_count() -> anyhow::Result<()> {
    let (pool, _repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    // A submitted payment with an expiry stored (however it got there)
    // must not grant access.
    sqlx::query(
        "INSERT INTO payments (id, student_id, plan, amount, status, created_at, expires_at)
         VALUES (?, ?, '1month', 3000, 'submitted', ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id.to_string())
    .bind(now.to_rfc3339())
    .bind((now + Duration::days(30)).to_rfc3339())
    .execute(&pool)
    .await?;

    let status = fees.fee_status(student_id, now).await;
    assert!(!status.is_paid);

    Ok(())
}

#[tokio::test]
async fn legacy_timestamp_shapes_are_coerced() -> anyhow::Result<()> {
    let (pool, _repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let future = now + Duration::days(15);

    // Epoch seconds, written as a number by the old importer.
    sqlx::query(
        "INSERT INTO payments (id, student_id, plan, amount, status, created_at, expires_at)
         VALUES (?, ?, '1month', 3000, 'verified', ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id.to_string())
    .bind(now.timestamp())
    .bind(future.timestamp())
    .execute(&pool)
    .await?;

    // Naive datetime text.
    sqlx::query(
        "INSERT INTO payments (id, student_id, plan, amount, status, created_at, expires_at)
         VALUES (?, ?, '1month', 3000, 'verified', ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id.to_string())
    .bind(now.format("%Y-%m-%d %H:%M:%S").to_string())
    .bind((now + Duration::days(5)).format("%Y-%m-%d %H:%M:%S").to_string())
    .execute(&pool)
    .await?;

    // Garbage expiry: the record is skipped, not fatal.
    sqlx::query(
        "INSERT INTO payments (id, student_id, plan, amount, status, created_at, expires_at)
         VALUES (?, ?, '1month', 3000, 'verified', ?, 'soon')",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id.to_string())
    .bind(now.to_rfc3339())
    .execute(&pool)
    .await?;

    let status = fees.fee_status(student_id, now).await;
    assert!(status.is_paid);
    assert_eq!(status.expires_at.map(|e| e.timestamp()), Some(future.timestamp()));

    Ok(())
}

#[tokio::test]
async fn backend_failure_degrades_to_unpaid() -> anyhow::Result<()> {
    let (pool, _repo, fees) = setup().await?;

    let student_id = Uuid::new_v4();
    pool.close().await;

    let status = fees.fee_status(student_id, Utc::now()).await;
    assert!(!status.is_paid);
    assert_eq!(status.expires_at, None);
    assert_eq!(status.days_remaining, 0);

    Ok(())
}

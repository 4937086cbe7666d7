use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use rookery::{
    domain::{Account, AccountStatus, PaymentStatus, Plan, Role},
    error::AppError,
    repository::{
        AccountRepository, CreateAccount, PaymentRepository, SqliteAccountRepository,
        SqlitePaymentRepository,
    },
    service::{FeeService, PaymentService},
};

struct Fixture {
    pool: SqlitePool,
    accounts: Arc<SqliteAccountRepository>,
    payments: Arc<SqlitePaymentRepository>,
    service: PaymentService,
}

async fn setup() -> anyhow::Result<Fixture> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
    let payments = Arc::new(SqlitePaymentRepository::new(pool.clone()));
    let fees = Arc::new(FeeService::new(payments.clone()));
    let service = PaymentService::new(payments.clone(), accounts.clone(), fees);

    Ok(Fixture {
        pool,
        accounts,
        payments,
        service,
    })
}

async fn create_student(fixture: &Fixture, email: &str) -> anyhow::Result<Account> {
    Ok(fixture
        .accounts
        .create(CreateAccount {
            email: email.to_string(),
            password_hash: "unused".to_string(),
            name: "Test Student".to_string(),
            phone: None,
            age: Some(12),
            parent_name: None,
            role: Role::Student,
        })
        .await?)
}

#[tokio::test]
async fn open_payment_creation_is_idempotent() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc::now();

    let first = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let second = fixture
        .service
        .initiate(student.id, Plan::ThreeMonths, now + Duration::hours(1))
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(fixture.payments.find_by_student(student.id).await?.len(), 1);

    // Still open after submission: a third attempt returns the same record.
    fixture.service.mark_sent(student.id, first.id, now).await?;
    let third = fixture
        .service
        .initiate(student.id, Plan::OneMonth, now + Duration::hours(2))
        .await?;
    assert_eq!(third.id, first.id);

    Ok(())
}

#[tokio::test]
async fn plan_fixes_the_amount() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;

    let payment = fixture
        .service
        .initiate(student.id, Plan::ThreeMonths, Utc::now())
        .await?;

    assert_eq!(payment.amount, 7500);
    assert_eq!(payment.status, PaymentStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn submit_requires_ownership() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let owner = create_student(&fixture, "owner@example.com").await?;
    let other = create_student(&fixture, "other@example.com").await?;
    let now = Utc::now();

    let payment = fixture.service.initiate(owner.id, Plan::OneMonth, now).await?;

    let err = fixture
        .service
        .mark_sent(other.id, payment.id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = fixture
        .service
        .mark_sent(owner.id, Uuid::new_v4(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn submit_flips_the_fees_paid_cache_only() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc::now();

    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let submitted = fixture.service.mark_sent(student.id, payment.id, now).await?;

    assert_eq!(submitted.status, PaymentStatus::Submitted);
    assert!(submitted.submitted_at.is_some());

    let account = fixture.accounts.find_by_id(student.id).await?.unwrap();
    assert!(account.fees_paid);
    assert!(!account.payment_verified);
    // Submission alone never activates.
    assert_eq!(account.status, AccountStatus::New);

    Ok(())
}

#[tokio::test]
async fn verify_starts_coverage_from_now_for_first_payment() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    fixture.service.mark_sent(student.id, payment.id, now).await?;
    let verified = fixture.service.verify(payment.id, now).await?;

    assert_eq!(verified.status, PaymentStatus::Verified);
    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap())
    );

    let account = fixture.accounts.find_by_id(student.id).await?.unwrap();
    assert!(account.fees_paid);
    assert!(account.payment_verified);
    assert_eq!(account.status, AccountStatus::Active);

    Ok(())
}

#[tokio::test]
async fn verify_extends_from_a_still_active_expiry() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;

    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let first = fixture.service.initiate(student.id, Plan::ThreeMonths, now).await?;
    fixture.service.verify(first.id, now).await?;

    // Paid through June 10; verifying another month two weeks later must
    // append to June 10, not restart from the verification date.
    let later = now + Duration::days(14);
    let second = fixture.service.initiate(student.id, Plan::OneMonth, later).await?;
    let verified = fixture.service.verify(second.id, later).await?;

    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 7, 10, 9, 0, 0).unwrap())
    );

    Ok(())
}

#[tokio::test]
async fn verify_restarts_from_now_after_a_lapse() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;

    let past = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let first = fixture.service.initiate(student.id, Plan::OneMonth, past).await?;
    fixture.service.verify(first.id, past).await?;

    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let second = fixture.service.initiate(student.id, Plan::ThreeMonths, now).await?;
    let verified = fixture.service.verify(second.id, now).await?;

    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap())
    );

    Ok(())
}

#[tokio::test]
async fn month_arithmetic_clamps_to_month_end() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;

    // Jan 31 + 1 calendar month lands on the last day of February.
    let now = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let verified = fixture.service.verify(payment.id, now).await?;

    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap())
    );

    Ok(())
}

#[tokio::test]
async fn month_arithmetic_respects_leap_years() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;

    let now = Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap();
    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let verified = fixture.service.verify(payment.id, now).await?;

    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap())
    );

    Ok(())
}

#[tokio::test]
async fn double_verification_conflicts() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc::now();

    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let verified = fixture.service.verify(payment.id, now).await?;

    let err = fixture.service.verify(payment.id, now).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The stored expiry is unchanged.
    let reloaded = fixture.payments.find_by_id(payment.id).await?.unwrap();
    assert_eq!(reloaded.expires_at, verified.expires_at);

    Ok(())
}

#[tokio::test]
async fn reject_records_reason_without_touching_caches() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc::now();

    let payment = fixture.service.initiate(student.id, Plan::OneMonth, now).await?;
    let rejected = fixture
        .service
        .reject(payment.id, "Screenshot unreadable", now)
        .await?;

    assert_eq!(rejected.status, PaymentStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Screenshot unreadable"));
    assert!(rejected.rejected_at.is_some());

    let account = fixture.accounts.find_by_id(student.id).await?.unwrap();
    assert!(!account.fees_paid);
    assert!(!account.payment_verified);

    Ok(())
}

#[tokio::test]
async fn offline_payment_is_create_and_verify_in_one_step() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

    let (payment, extended) = fixture
        .service
        .record_offline(student.id, Plan::ThreeMonths, "cash", None, now)
        .await?;

    assert!(!extended);
    assert!(payment.offline);
    assert_eq!(payment.status, PaymentStatus::Verified);
    assert_eq!(
        payment.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap())
    );

    let account = fixture.accounts.find_by_id(student.id).await?.unwrap();
    assert_eq!(account.status, AccountStatus::Active);

    // A second offline payment while coverage is active extends it.
    let (second, extended) = fixture
        .service
        .record_offline(student.id, Plan::OneMonth, "cash", None, now + Duration::days(1))
        .await?;
    assert!(extended);
    assert_eq!(
        second.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 7, 10, 9, 0, 0).unwrap())
    );

    Ok(())
}

#[tokio::test]
async fn unrecognized_stored_plan_verifies_as_one_month() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let student = create_student(&fixture, "a@example.com").await?;
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

    // A legacy row with a plan value nothing recognizes.
    let payment_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO payments (id, student_id, plan, amount, status, created_at)
         VALUES (?, ?, '6weeks', 4000, 'submitted', ?)",
    )
    .bind(payment_id.to_string())
    .bind(student.id.to_string())
    .bind(now.to_rfc3339())
    .execute(&fixture.pool)
    .await?;

    let verified = fixture.service.verify(payment_id, now).await?;
    assert_eq!(
        verified.expires_at,
        Some(Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap())
    );

    Ok(())
}

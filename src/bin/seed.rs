use chrono::{Months, Utc};
use clap::Parser;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use rookery::{
    auth::AuthService,
    domain::{Payment, PaymentStatus, Plan},
    repository::{
        AccountRepository, CreateAccount, PaymentRepository, SqliteAccountRepository,
        SqlitePaymentRepository,
    },
};

/// Provision the admin account and, optionally, sample students with
/// payment histories for local development.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// Admin login email
    #[arg(long, default_value = "admin@rookery.local")]
    admin_email: String,

    /// Admin password
    #[arg(long, default_value = "change-me-now")]
    admin_password: String,

    /// Number of fake students to create
    #[arg(long, default_value_t = 0)]
    students: u32,
}

const BATCHES: &[&str] = &["online1", "online2", "offline_advance", "offline_base"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Starting database seeding...");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:rookery.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let account_repo = SqliteAccountRepository::new(db_pool.clone());
    let payment_repo = SqlitePaymentRepository::new(db_pool.clone());

    if account_repo.find_by_email(&args.admin_email).await?.is_some() {
        println!("Admin {} already exists, skipping", args.admin_email);
    } else {
        let password_hash = AuthService::hash_password(&args.admin_password).await?;
        account_repo
            .create(CreateAccount {
                email: args.admin_email.clone(),
                password_hash,
                name: "Admin".to_string(),
                phone: None,
                age: None,
                parent_name: None,
                role: rookery::domain::Role::Admin,
            })
            .await?;
        println!("Created admin account ({})", args.admin_email);
    }

    let now = Utc::now();

    for i in 0..args.students {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let password_hash = AuthService::hash_password("password123").await?;

        let student = account_repo
            .create(CreateAccount {
                email,
                password_hash,
                name,
                phone: Some(format!("98{:08}", (10_000_000 + i as u64 * 7919) % 100_000_000)),
                age: Some(8 + (i as i64 % 16)),
                parent_name: Some(Name().fake()),
                role: rookery::domain::Role::Student,
            })
            .await?;

        // Every third student stays a fresh applicant; the rest get a batch
        // and a verified month of coverage.
        if i % 3 != 0 {
            let batch = BATCHES[i as usize % BATCHES.len()];
            account_repo.assign_batch(student.id, batch, now).await?;

            let plan = if i % 2 == 0 { Plan::OneMonth } else { Plan::ThreeMonths };
            let expires_at = now
                .checked_add_months(Months::new(plan.months()))
                .unwrap_or(now);

            payment_repo
                .create(Payment {
                    id: Uuid::new_v4(),
                    student_id: student.id,
                    plan,
                    amount: plan.amount(),
                    status: PaymentStatus::Verified,
                    payment_method: Some("upi".to_string()),
                    notes: None,
                    offline: false,
                    created_at: now,
                    submitted_at: Some(now),
                    verified_at: Some(now),
                    rejected_at: None,
                    expires_at: Some(expires_at),
                    rejection_reason: None,
                })
                .await?;
            account_repo.mark_payment_verified(student.id, now).await?;
        }
    }

    if args.students > 0 {
        println!("Created {} sample students (password123)", args.students);
    }

    println!("Seeding complete");
    Ok(())
}

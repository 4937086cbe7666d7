use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rookery::{
    api,
    auth::AuthService,
    config::Settings,
    repository::{
        SqliteAccountRepository, SqliteChatSessionRepository, SqliteEnquiryRepository,
        SqliteNoticeRepository, SqlitePaymentRepository, SqliteStudyMaterialRepository,
    },
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rookery=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Rookery server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // The store client is built once here and handed to every component;
    // nothing reaches for an ambient global.
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        settings.auth.session_duration_hours,
    ));

    let account_repo = Arc::new(SqliteAccountRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));
    let notice_repo = Arc::new(SqliteNoticeRepository::new(db_pool.clone()));
    let material_repo = Arc::new(SqliteStudyMaterialRepository::new(db_pool.clone()));
    let enquiry_repo = Arc::new(SqliteEnquiryRepository::new(db_pool.clone()));
    let chat_session_repo = Arc::new(SqliteChatSessionRepository::new(db_pool.clone()));

    let service_context = Arc::new(ServiceContext::new(
        account_repo,
        payment_repo,
        notice_repo,
        material_repo,
        enquiry_repo,
        chat_session_repo,
        auth_service,
        db_pool.clone(),
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}

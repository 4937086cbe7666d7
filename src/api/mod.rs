pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Public surface
        .route("/enquiry", post(handlers::auth::submit_enquiry))
        .route("/api/chat", post(handlers::chat::chat))
        // Auth routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // Role-gated surfaces
        .nest("/student", student_routes(app_state.clone()))
        .nest("/admin", admin_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn student_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::student::dashboard))
        .route("/payments", get(handlers::student::payment_history))
        .route("/payments", post(handlers::student::create_payment))
        .route("/payments/:id/submit", post(handlers::student::submit_payment))
        .route("/notices", get(handlers::student::notices))
        .route("/materials", get(handlers::student::study_materials))
        .route("/assignments", get(handlers::student::assignments))
        .route("/profile", get(handlers::student::profile))
        .route("/profile", put(handlers::student::update_profile))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_student,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/enquiries", get(handlers::admin::list_enquiries))
        .route("/enquiries/:id", delete(handlers::admin::delete_enquiry))
        .route("/students", get(handlers::admin::list_students))
        .route("/students/export", get(handlers::admin::export_students))
        .route("/applicants", get(handlers::admin::list_applicants))
        .route("/students/:id/batch", post(handlers::admin::assign_batch))
        .route("/students/:id/status", post(handlers::admin::set_student_status))
        .route("/students/:id/rating", post(handlers::admin::set_student_rating))
        .route("/students/:id/fee-history", get(handlers::admin::fee_history))
        .route(
            "/students/:id/offline-payment",
            post(handlers::admin::record_offline_payment),
        )
        .route("/payments", get(handlers::admin::list_payments))
        .route("/payments/:id/verify", post(handlers::admin::verify_payment))
        .route("/payments/:id/reject", post(handlers::admin::reject_payment))
        .route("/notices", post(handlers::admin::create_notice))
        .route("/notices", get(handlers::admin::list_notices))
        .route("/notices/:id", delete(handlers::admin::delete_notice))
        .route("/materials", post(handlers::admin::create_material))
        .route("/materials", get(handlers::admin::list_materials))
        .route("/materials/:id", delete(handlers::admin::delete_material))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}

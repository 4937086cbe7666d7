use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Plan, ProfileUpdateRequest},
    error::{AppError, Result},
};

const BATCH_FEED_LIMIT: i64 = 5;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let now = Utc::now();
    let account = &current_user.account;

    let payments = state
        .service_context
        .payment_repo
        .find_by_student(account.id)
        .await?;
    let fee_status = state.service_context.fee_service.fee_status(account.id, now).await;

    Ok(Json(json!({
        "student": account,
        "payments": payments,
        "fee_status": fee_status,
    })))
}

/// Payment history. Old records are swept opportunistically before the list
/// is served; a failed sweep never fails the page.
pub async fn payment_history(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let now = Utc::now();
    state.service_context.fee_service.sweep_old_payments(now).await;

    let payments = state
        .service_context
        .payment_repo
        .find_by_student(current_user.account.id)
        .await?;

    Ok(Json(json!({ "payments": payments })))
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub plan: String,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<Value>> {
    let plan = Plan::parse(&request.plan)
        .ok_or_else(|| AppError::BadRequest("Invalid plan".to_string()))?;

    let payment = state
        .service_context
        .payment_service
        .initiate(current_user.account.id, plan, Utc::now())
        .await?;

    Ok(Json(json!({
        "payment_id": payment.id,
        "amount": payment.amount,
        "status": payment.status,
    })))
}

pub async fn submit_payment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let payment = state
        .service_context
        .payment_service
        .mark_sent(current_user.account.id, payment_id, Utc::now())
        .await?;

    Ok(Json(json!({
        "payment_id": payment.id,
        "status": payment.status,
        "submitted_at": payment.submitted_at,
    })))
}

pub async fn notices(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let notices = match &current_user.account.batch {
        Some(batch) => {
            state
                .service_context
                .notice_repo
                .list_for_batch(batch, BATCH_FEED_LIMIT)
                .await?
        }
        None => Vec::new(),
    };

    Ok(Json(json!({ "notices": notices })))
}

pub async fn study_materials(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let materials = match &current_user.account.batch {
        Some(batch) => {
            state
                .service_context
                .material_repo
                .list_for_batch(batch, BATCH_FEED_LIMIT)
                .await?
        }
        None => Vec::new(),
    };

    Ok(Json(json!({ "materials": materials })))
}

pub async fn assignments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let assignments = match &current_user.account.batch {
        Some(batch) => {
            state
                .service_context
                .material_repo
                .list_assignments_for_batch(batch)
                .await?
        }
        None => Vec::new(),
    };

    Ok(Json(json!({ "assignments": assignments })))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let now = Utc::now();
    let account = &current_user.account;
    let fee_status = state.service_context.fee_service.fee_status(account.id, now).await;

    Ok(Json(json!({
        "student": account,
        "fee_status": fee_status,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let account = state
        .service_context
        .account_service
        .update_profile(current_user.account.id, request, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(json!({ "student": account }))))
}

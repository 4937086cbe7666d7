use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CreateEnquiryRequest, Enquiry, EnquiryStatus, LoginRequest, RegisterRequest},
    error::{AppError, Result},
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let account = state
        .service_context
        .account_service
        .register(request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": account.id,
            "name": account.name,
            "email": account.email,
            "status": account.status,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    let accounts = &state.service_context.account_repo;
    let auth = &state.service_context.auth_service;

    let account = accounts
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let hash = accounts
        .password_hash_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !crate::auth::AuthService::verify_password(&request.password, &hash).await? {
        return Err(AppError::Unauthorized);
    }

    let (_session, token) = auth.create_session(account.id).await?;
    let cookie = auth.create_session_cookie(&token, state.settings.auth.secure_cookies);

    Ok((
        jar.add(cookie),
        Json(json!({
            "id": account.id,
            "name": account.name,
            "role": account.role,
        })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>)> {
    if let Some(cookie) = jar.get("session") {
        state
            .service_context
            .auth_service
            .invalidate_session(cookie.value())
            .await?;
    }

    Ok((
        jar.add(crate::auth::AuthService::create_logout_cookie()),
        Json(json!({ "success": true })),
    ))
}

pub async fn submit_enquiry(
    State(state): State<AppState>,
    Json(request): Json<CreateEnquiryRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let phone = request
        .phone_digits()
        .ok_or_else(|| AppError::BadRequest("Phone must be 10 digits".to_string()))?;

    let enquiry = Enquiry {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        phone,
        batch: request.batch,
        message: request.message,
        status: EnquiryStatus::New,
        created_at: Utc::now(),
    };

    let created = state.service_context.enquiry_repo.create(enquiry).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": created.id }))))
}

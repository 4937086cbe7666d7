use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{
        AccountStatus, CreateMaterialRequest, CreateNoticeRequest, MaterialKind, Notice,
        PaymentStatus, Plan, StudyMaterial,
    },
    error::{AppError, Result},
};

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>> {
    let now = Utc::now();
    let ctx = &state.service_context;

    let students = ctx.account_repo.list_students().await?;

    let mut active = 0usize;
    let mut fresh = 0usize;
    let mut disabled = 0usize;
    let mut fees_paid = 0usize;
    let mut fees_unpaid = 0usize;
    let mut batch_distribution: HashMap<String, usize> = HashMap::new();

    for student in &students {
        match student.status {
            AccountStatus::Active => active += 1,
            AccountStatus::New => fresh += 1,
            AccountStatus::Disabled => disabled += 1,
        }

        let fee_status = ctx.fee_service.fee_status(student.id, now).await;
        if fee_status.is_paid {
            fees_paid += 1;
        } else {
            fees_unpaid += 1;
        }

        let batch = student
            .batch
            .clone()
            .unwrap_or_else(|| "Unassigned".to_string());
        *batch_distribution.entry(batch).or_default() += 1;
    }

    let recent_registrations: Vec<Value> = students
        .iter()
        .filter(|s| (now - s.registration_date).num_days() <= 30)
        .take(5)
        .map(|s| {
            json!({
                "name": s.name,
                "date": s.registration_date,
                "batch": s.batch,
            })
        })
        .collect();

    let new_enquiry_count = ctx.enquiry_repo.count_new().await.unwrap_or(0);
    let new_payment_count = ctx
        .payment_repo
        .count_by_status(PaymentStatus::Submitted)
        .await
        .unwrap_or(0);

    Ok(Json(json!({
        "total_students": students.len(),
        "active_students": active,
        "new_students": fresh,
        "disabled_students": disabled,
        "fees_paid_count": fees_paid,
        "fees_unpaid_count": fees_unpaid,
        "batch_distribution": batch_distribution,
        "recent_registrations": recent_registrations,
        "new_enquiry_count": new_enquiry_count,
        "new_applicant_count": fresh,
        "new_payment_count": new_payment_count,
    })))
}

/// Listing enquiries flips every `new` one to `seen`.
pub async fn list_enquiries(State(state): State<AppState>) -> Result<Json<Value>> {
    let enquiries = state.service_context.enquiry_repo.list_all().await?;
    state.service_context.enquiry_repo.mark_all_seen().await?;

    Ok(Json(json!({ "enquiries": enquiries })))
}

pub async fn delete_enquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    state.service_context.enquiry_repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize, Default)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub batch: Option<String>,
    pub fees: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Value>> {
    let now = Utc::now();
    let ctx = &state.service_context;

    let students = match filter.status.as_deref() {
        Some("new") => ctx.account_repo.list_students_by_status(AccountStatus::New).await?,
        Some("active") => {
            ctx.account_repo
                .list_students_by_status(AccountStatus::Active)
                .await?
        }
        Some("disabled") => {
            ctx.account_repo
                .list_students_by_status(AccountStatus::Disabled)
                .await?
        }
        _ => ctx.account_repo.list_students().await?,
    };

    let search = filter.search.as_deref().map(str::to_lowercase);

    let mut rows = Vec::new();
    for student in students {
        if let Some(batch_filter) = &filter.batch {
            if student.batch.as_deref() != Some(batch_filter.as_str()) {
                continue;
            }
        }

        if let Some(needle) = &search {
            let haystack = format!(
                "{} {} {}",
                student.name.to_lowercase(),
                student.email.to_lowercase(),
                student.phone.as_deref().unwrap_or("")
            );
            if !haystack.contains(needle.as_str()) {
                continue;
            }
        }

        let fee_status = ctx.fee_service.fee_status(student.id, now).await;
        match filter.fees.as_deref() {
            Some("paid") if !fee_status.is_paid => continue,
            Some("unpaid") if fee_status.is_paid => continue,
            _ => {}
        }

        rows.push((student, fee_status));
    }

    match filter.sort.as_deref() {
        Some("rating_high") => rows.sort_by(|a, b| b.0.rating.cmp(&a.0.rating)),
        Some("rating_low") => rows.sort_by(|a, b| a.0.rating.cmp(&b.0.rating)),
        Some("name") => rows.sort_by(|a, b| a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase())),
        // Newest first is the repository's natural order.
        _ => {}
    }

    let students: Vec<Value> = rows
        .into_iter()
        .map(|(student, fee_status)| {
            json!({
                "student": student,
                "fee_status": fee_status,
            })
        })
        .collect();

    Ok(Json(json!({ "students": students })))
}

pub async fn export_students(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let now = Utc::now();
    let ctx = &state.service_context;
    let students = ctx.account_repo.list_students().await?;

    let mut csv = String::from("Name,Email,Phone,Age,Batch,Status,Fees Paid,Fee Expiry,Registration Date\n");
    for student in students {
        let fee_status = ctx.fee_service.fee_status(student.id, now).await;
        let expiry = fee_status
            .expires_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_field(&student.name),
            csv_field(&student.email),
            csv_field(student.phone.as_deref().unwrap_or("")),
            student.age.map(|a| a.to_string()).unwrap_or_default(),
            csv_field(student.batch.as_deref().unwrap_or("")),
            serde_json::to_value(student.status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            if fee_status.is_paid { "Yes" } else { "No" },
            expiry,
            student.registration_date.format("%Y-%m-%d"),
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    ))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Students still in `new` state, each with their latest resolved-or-pending
/// payment so the admin can verify and assign in one pass.
pub async fn list_applicants(State(state): State<AppState>) -> Result<Json<Value>> {
    let ctx = &state.service_context;
    let applicants = ctx
        .account_repo
        .list_students_by_status(AccountStatus::New)
        .await?;

    let mut rows = Vec::new();
    for applicant in applicants {
        let latest_payment = ctx
            .payment_repo
            .find_by_student(applicant.id)
            .await?
            .into_iter()
            .find(|p| {
                matches!(
                    p.status,
                    PaymentStatus::Submitted | PaymentStatus::Verified | PaymentStatus::Rejected
                )
            });

        rows.push(json!({
            "student": applicant,
            "payment": latest_payment,
        }));
    }

    Ok(Json(json!({ "students": rows })))
}

#[derive(Debug, Deserialize)]
pub struct AssignBatchRequest {
    pub batch: String,
}

pub async fn assign_batch(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<AssignBatchRequest>,
) -> Result<Json<Value>> {
    let account = state
        .service_context
        .account_service
        .assign_batch(student_id, &request.batch, Utc::now())
        .await?;

    Ok(Json(json!({
        "student": account,
        "message": "Batch assigned, student activated",
    })))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: AccountStatus,
}

pub async fn set_student_status(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Value>> {
    let account = state
        .service_context
        .account_service
        .set_status(student_id, request.status, Utc::now())
        .await?;

    Ok(Json(json!({ "student": account })))
}

#[derive(Debug, Deserialize)]
pub struct SetRatingRequest {
    pub rating: i64,
}

pub async fn set_student_rating(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<SetRatingRequest>,
) -> Result<Json<Value>> {
    let account = state
        .service_context
        .account_service
        .set_rating(student_id, request.rating)
        .await?;

    Ok(Json(json!({ "student": account })))
}

pub async fn fee_history(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let now = Utc::now();
    let mut payments = state
        .service_context
        .payment_repo
        .find_verified_by_student(student_id)
        .await?;

    payments.sort_by(|a, b| b.verified_at.cmp(&a.verified_at));

    let rows: Vec<Value> = payments
        .into_iter()
        .map(|p| {
            let is_active = p.expires_at.map(|e| e > now).unwrap_or(false);
            json!({
                "payment": p,
                "is_active": is_active,
            })
        })
        .collect();

    Ok(Json(json!({ "payments": rows })))
}

#[derive(Debug, Deserialize)]
pub struct OfflinePaymentRequest {
    pub plan: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    pub notes: Option<String>,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

pub async fn record_offline_payment(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<OfflinePaymentRequest>,
) -> Result<Json<Value>> {
    let plan = Plan::parse(&request.plan)
        .ok_or_else(|| AppError::BadRequest("Invalid plan".to_string()))?;

    let (payment, extended) = state
        .service_context
        .payment_service
        .record_offline(
            student_id,
            plan,
            &request.payment_method,
            request.notes,
            Utc::now(),
        )
        .await?;

    Ok(Json(json!({
        "payment_id": payment.id,
        "extended": extended,
        "expires_at": payment.expires_at,
    })))
}

pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Value>> {
    let ctx = &state.service_context;
    let payments = ctx.payment_repo.list_all().await?;

    // One lookup per distinct student, not per payment.
    let mut names: HashMap<Uuid, (String, Option<String>)> = HashMap::new();
    let mut rows = Vec::new();

    for payment in payments {
        if !names.contains_key(&payment.student_id) {
            let entry = match ctx.account_repo.find_by_id(payment.student_id).await? {
                Some(account) => (account.name, account.batch),
                None => ("Deleted User".to_string(), None),
            };
            names.insert(payment.student_id, entry);
        }
        let (name, batch) = &names[&payment.student_id];

        rows.push(json!({
            "payment": payment,
            "student_name": name,
            "batch": batch,
        }));
    }

    Ok(Json(json!({ "payments": rows })))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let payment = state
        .service_context
        .payment_service
        .verify(payment_id, Utc::now())
        .await?;

    Ok(Json(json!({
        "payment_id": payment.id,
        "status": payment.status,
        "expires_at": payment.expires_at,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RejectPaymentRequest {
    #[serde(default = "default_rejection_reason")]
    pub reason: String,
}

fn default_rejection_reason() -> String {
    "Not specified".to_string()
}

pub async fn reject_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<RejectPaymentRequest>,
) -> Result<Json<Value>> {
    let payment = state
        .service_context
        .payment_service
        .reject(payment_id, &request.reason, Utc::now())
        .await?;

    Ok(Json(json!({
        "payment_id": payment.id,
        "status": payment.status,
    })))
}

pub async fn create_notice(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let notice = Notice {
        id: Uuid::new_v4(),
        title: request.title,
        content: request.content,
        batch: request.batch,
        priority: request.priority,
        created_by: current_user.account.id,
        created_by_name: current_user.account.name.clone(),
        created_at: Utc::now(),
    };

    let created = state.service_context.notice_repo.create(notice).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": created.id }))))
}

pub async fn list_notices(State(state): State<AppState>) -> Result<Json<Value>> {
    let notices = state.service_context.notice_repo.list_recent(50).await?;
    Ok(Json(json!({ "notices": notices })))
}

pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    state.service_context.notice_repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn create_material(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let material = StudyMaterial {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        link: request.link,
        batch: request.batch,
        kind: request.kind.unwrap_or(MaterialKind::Notes),
        created_by: current_user.account.id,
        created_by_name: current_user.account.name.clone(),
        created_at: Utc::now(),
    };

    let created = state.service_context.material_repo.create(material).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": created.id }))))
}

pub async fn list_materials(State(state): State<AppState>) -> Result<Json<Value>> {
    let materials = state.service_context.material_repo.list_recent(50).await?;
    Ok(Json(json!({ "materials": materials })))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    state.service_context.material_repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

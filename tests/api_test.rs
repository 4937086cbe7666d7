use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use rookery::{
    api,
    auth::AuthService,
    config::Settings,
    domain::Role,
    repository::{
        AccountRepository, CreateAccount, SqliteAccountRepository, SqliteChatSessionRepository,
        SqliteEnquiryRepository, SqliteNoticeRepository, SqlitePaymentRepository,
        SqliteStudyMaterialRepository,
    },
    service::ServiceContext,
};

async fn build_app() -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth_service = Arc::new(AuthService::new(pool.clone(), 120));
    let service_context = Arc::new(ServiceContext::new(
        Arc::new(SqliteAccountRepository::new(pool.clone())),
        Arc::new(SqlitePaymentRepository::new(pool.clone())),
        Arc::new(SqliteNoticeRepository::new(pool.clone())),
        Arc::new(SqliteStudyMaterialRepository::new(pool.clone())),
        Arc::new(SqliteEnquiryRepository::new(pool.clone())),
        Arc::new(SqliteChatSessionRepository::new(pool.clone())),
        auth_service,
        pool,
    ));

    let app = api::create_app(service_context.clone(), Arc::new(Settings::default()));
    Ok((app, service_context))
}

fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Runs register + login and returns the session cookie pair.
async fn login_student(app: &Router, email: &str) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            &json!({
                "email": email,
                "password": "knightf3",
                "name": "Test Student",
                "age": 12,
            }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            &json!({ "email": email, "password": "knightf3" }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()?;
    Ok(set_cookie.split(';').next().unwrap().to_string())
}

#[tokio::test]
async fn health_check_is_public() -> anyhow::Result<()> {
    let (app, _ctx) = build_app().await?;

    let response = app.oneshot(get_request("/health", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn student_and_admin_surfaces_require_a_session() -> anyhow::Result<()> {
    let (app, _ctx) = build_app().await?;

    for uri in ["/student/dashboard", "/student/payments", "/admin/stats", "/admin/payments"] {
        let response = app.clone().oneshot(get_request(uri, None)).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    Ok(())
}

#[tokio::test]
async fn enquiry_validates_before_writing() -> anyhow::Result<()> {
    let (app, ctx) = build_app().await?;

    // Phone must carry ten digits.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/enquiry",
            &json!({
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "12345",
                "message": "Looking for a beginner batch",
            }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.enquiry_repo.count_new().await?, 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/enquiry",
            &json!({
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "98230-12345",
                "message": "Looking for a beginner batch",
            }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(ctx.enquiry_repo.count_new().await?, 1);

    Ok(())
}

#[tokio::test]
async fn registered_student_reaches_their_dashboard() -> anyhow::Result<()> {
    let (app, _ctx) = build_app().await?;

    let cookie = login_student(&app, "meera@example.com").await?;

    let response = app
        .clone()
        .oneshot(get_request("/student/dashboard", Some(&cookie)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn student_session_cannot_reach_admin_surface() -> anyhow::Result<()> {
    let (app, _ctx) = build_app().await?;

    let cookie = login_student(&app, "meera@example.com").await?;

    let response = app
        .clone()
        .oneshot(get_request("/admin/stats", Some(&cookie)))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn invalid_plan_is_rejected_before_any_write() -> anyhow::Result<()> {
    let (app, ctx) = build_app().await?;

    let cookie = login_student(&app, "meera@example.com").await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/student/payments",
            &json!({ "plan": "forever" }),
            Some(&cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let students = ctx.account_repo.list_students().await?;
    let payments = ctx.payment_repo.find_by_student(students[0].id).await?;
    assert!(payments.is_empty());

    Ok(())
}

#[tokio::test]
async fn admin_session_verifies_a_submitted_payment() -> anyhow::Result<()> {
    let (app, ctx) = build_app().await?;

    // Student side: register, open a payment, mark it sent.
    let student_cookie = login_student(&app, "meera@example.com").await?;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/student/payments",
            &json!({ "plan": "1month" }),
            Some(&student_cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let payload: Value = serde_json::from_slice(&body)?;
    let payment_id = payload["payment_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/student/payments/{}/submit", payment_id),
            &json!({}),
            Some(&student_cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Admin side: provision an admin, log in, verify.
    let password_hash = AuthService::hash_password("rook-and-roll").await?;
    ctx.account_repo
        .create(CreateAccount {
            email: "admin@example.com".to_string(),
            password_hash,
            name: "Admin".to_string(),
            phone: None,
            age: None,
            parent_name: None,
            role: Role::Admin,
        })
        .await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            &json!({ "email": "admin@example.com", "password": "rook-and-roll" }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()?
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/payments/{}/verify", payment_id),
            &json!({}),
            Some(&admin_cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Verifying again conflicts instead of double-extending.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/payments/{}/verify", payment_id),
            &json!({}),
            Some(&admin_cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn chat_always_replies() -> anyhow::Result<()> {
    let (app, _ctx) = build_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            &json!({ "message": "how much are the fees?" }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let payload: Value = serde_json::from_slice(&body)?;
    assert!(payload["reply"].as_str().unwrap().contains("₹3,000"));
    assert_eq!(payload["close_chat"], Value::Bool(false));

    Ok(())
}

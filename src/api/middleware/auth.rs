use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    domain::{Account, AccountStatus, Role},
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub account: Account,
}

async fn authenticate(state: &AppState, jar: &CookieJar) -> Result<Account, AppError> {
    let session_cookie = jar.get("session").ok_or(AppError::Unauthorized)?;

    let session = state
        .service_context
        .auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    state
        .service_context
        .account_repo
        .find_by_id(session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Students in `new` state may still reach their pages (they have to pay
/// before activation); only disabled accounts are shut out.
pub async fn require_student(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account = authenticate(&state, &jar).await?;

    if account.role != Role::Student {
        return Err(AppError::Forbidden);
    }
    if account.status == AccountStatus::Disabled {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { account });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account = authenticate(&state, &jar).await?;

    if account.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { account });

    Ok(next.run(request).await)
}

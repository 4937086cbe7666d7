use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    chat::{self, responses, ChatUser},
    domain::Role,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// The widget must always get a reply; backend failures degrade to an
/// apologetic canned response instead of an error body.
pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Json<Value> {
    match chat_inner(&state, &jar, &headers, &request.message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("chat error: {}", e);
            let reply = responses::ERROR_REPLIES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(responses::ERROR_REPLIES[0]);
            Json(json!({ "reply": reply, "close_chat": false }))
        }
    }
}

async fn chat_inner(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
    message: &str,
) -> Result<Json<Value>> {
    let ctx = &state.service_context;

    let (user, session_id) = match resolve_user(state, jar).await {
        Some((user, id)) => (user, id),
        None => (ChatUser::guest(), guest_session_id(headers)),
    };

    let stage = current_egg_stage(state, &session_id).await;
    let reply = chat::respond(message, &user, stage);

    if let Some(new_stage) = reply.egg_stage {
        ctx.chat_session_repo
            .set(&session_id, new_stage > 0, new_stage)
            .await?;
    }

    Ok(Json(json!({
        "reply": reply.reply,
        "close_chat": reply.close_chat,
    })))
}

async fn resolve_user(state: &AppState, jar: &CookieJar) -> Option<(ChatUser, String)> {
    let cookie = jar.get("session")?;
    let session = state
        .service_context
        .auth_service
        .validate_session(cookie.value())
        .await
        .ok()??;
    let account = state
        .service_context
        .account_repo
        .find_by_id(session.user_id)
        .await
        .ok()??;

    let user = ChatUser {
        name: account.name.clone(),
        is_student: account.role == Role::Student,
    };
    Some((user, account.id.to_string()))
}

/// Guests are tracked by a hash of address + user agent, good enough to hold
/// easter-egg state for a few minutes.
fn guest_session_id(headers: &HeaderMap) -> String {
    use sha2::{Digest, Sha256};

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", ip, user_agent).as_bytes());
    format!("guest_{}", hex::encode(&hasher.finalize()[..16]))
}

async fn current_egg_stage(state: &AppState, session_id: &str) -> i64 {
    let stored = state
        .service_context
        .chat_session_repo
        .get(session_id)
        .await
        .ok()
        .flatten();

    match stored {
        Some(egg) if egg.active => {
            let age = (Utc::now() - egg.updated_at).num_seconds();
            if age < chat::EGG_STALE_AFTER_SECS {
                egg.stage
            } else {
                0
            }
        }
        _ => 0,
    }
}

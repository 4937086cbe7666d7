use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "rookery",
        "description": "Chess academy management server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

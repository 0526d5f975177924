//! Liveness greeting under the versioned API

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// GET /getting
async fn greeting() -> Json<Value> {
    Json(json!({ "message": "Hello from feedback api v1" }))
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/getting", get(greeting))
}

//! Per-teaching assessments

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::Assessment;

/// GET /assessments
async fn list_assessments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    let assessments = state.service.list_assessments().await?;
    Ok(Json(assessments))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/assessments", get(list_assessments))
}

//! Bulk feedback ingestion

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::Feedback;

/// Batch body: `{"assessments": [{teachingId, questionId, rating}, ...]}`
#[derive(Debug, Deserialize)]
pub struct FeedbackBatchRequest {
    #[serde(default, rename = "assessments")]
    pub feedback: Vec<Feedback>,
}

/// POST /feedbacks - all or nothing
async fn create_feedback(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<FeedbackBatchRequest>,
) -> Result<(StatusCode, Json<()>), ApiError> {
    state.service.bulk_ingest_feedback(req.feedback).await?;
    Ok((StatusCode::CREATED, Json(())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/feedbacks", post(create_feedback))
}

//! Question endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::{Question, Questions};

/// Create/update question request
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "enable")]
    pub enabled: bool,
}

/// `?q=enable` restricts the list to enabled questions
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

impl ListParams {
    fn only_enabled(&self) -> bool {
        self.q
            .as_deref()
            .is_some_and(|q| q.trim().eq_ignore_ascii_case("enable"))
    }
}

/// GET /questions
async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Questions>, ApiError> {
    let questions = state.service.list_questions().await?;
    if params.only_enabled() {
        return Ok(Json(questions.enabled()));
    }
    Ok(Json(questions))
}

/// POST /questions
async fn create_question(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<QuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let question = state
        .service
        .create_question(req.title, req.enabled)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// PUT /questions/{id}
async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<QuestionRequest>,
) -> Result<Json<Question>, ApiError> {
    let question = state
        .service
        .update_question(&id, req.title, req.enabled)
        .await?;
    Ok(Json(question))
}

/// Question routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", put(update_question))
}

//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;

use crate::http::server::AppState;

pub mod assessments;
pub mod feedbacks;
pub mod greeting;
pub mod health;
pub mod questions;

/// Routes mounted under `/api/v1`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(greeting::router())
        .merge(questions::router())
        .merge(feedbacks::router())
        .merge(assessments::router())
}

//! feedback-server: survey questions, bulk feedback ratings and
//! per-teaching assessments over PostgreSQL.
//!
//! Data flows service → statement builder → database handle → row
//! scanners → service. The HTTP layer is a thin shell over
//! [`FeedbackService`].

pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use db::{Db, DbConfig, DbError};
pub use http::{run_server, ServerConfig};
pub use service::{FeedbackService, ServiceError};

//! Domain models
//!
//! Wire names follow the public JSON contract (`enable`, `teachingId`,
//! `TeachingId`, ...); Rust field names follow Rust conventions.

pub mod assessment;
pub mod feedback;
pub mod question;
pub mod validation;

pub use assessment::Assessment;
pub use feedback::Feedback;
pub use question::{Question, Questions};
pub use validation::ValidationError;

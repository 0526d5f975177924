//! Feedback ratings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// One rating of one question for one teaching. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Server-generated; any caller-supplied value is replaced.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub teaching_id: String,
    #[serde(default)]
    pub question_id: String,
    pub rating: Decimal,
}

impl Feedback {
    pub fn new(
        teaching_id: impl Into<String>,
        question_id: impl Into<String>,
        rating: Decimal,
    ) -> Self {
        Self {
            id: String::new(),
            teaching_id: teaching_id.into(),
            question_id: question_id.into(),
            rating,
        }
    }

    /// Required fields must be non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.teaching_id.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "teachingId",
            });
        }
        if self.question_id.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "questionId",
            });
        }
        Ok(())
    }
}

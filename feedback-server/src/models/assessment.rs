//! Per-teaching average rating, computed on read

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mean of all feedback ratings for one teaching. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(rename = "TeachingId")]
    pub teaching_id: String,
    pub rating: Decimal,
}

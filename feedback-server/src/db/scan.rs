//! Row scanner adapters
//!
//! Each entity declares its column list once. The same list feeds the
//! statement builder and the positional scan, so single-row and multi-row
//! paths always bind columns in the same order.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::{Assessment, Question};

pub const QUESTIONS_TABLE: &str = "questions";
pub const FEEDBACK_TABLE: &str = "feedback_remarks";

/// Column order for `feedback_remarks` inserts.
pub const FEEDBACK_COLUMNS: &[&str] = &["id", "teaching_id", "question_id", "rating"];

/// An entity that can be materialised from a result row by position.
pub trait ScanRow: Sized {
    /// Select list, in the order [`ScanRow::scan`] reads it.
    const COLUMNS: &'static [&'static str];

    fn scan(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl ScanRow for Question {
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "is_display", "updated_by", "updated_at"];

    fn scan(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(0)?,
            title: row.try_get(1)?,
            enabled: row.try_get(2)?,
            updated_by: row.try_get(3)?,
            updated_at: row.try_get(4)?,
        })
    }
}

impl ScanRow for Assessment {
    // NUMERIC division keeps the mean exact.
    const COLUMNS: &'static [&'static str] = &["teaching_id", "SUM(rating)/COUNT(id) AS rating"];

    fn scan(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            teaching_id: row.try_get(0)?,
            rating: row.try_get(1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_columns_match_schema_order() {
        assert_eq!(
            Question::COLUMNS,
            &["id", "title", "is_display", "updated_by", "updated_at"]
        );
    }

    #[test]
    fn assessment_groups_by_first_column() {
        assert_eq!(Assessment::COLUMNS[0], "teaching_id");
        assert_eq!(Assessment::COLUMNS[1], "SUM(rating)/COUNT(id) AS rating");
    }
}

//! Statement builder
//!
//! Produces `(sql, args)` pairs in the PostgreSQL `$n` placeholder dialect.
//! Values never enter the statement text: every value becomes a positional
//! argument, numbered in the order it was declared. Table and column names
//! are `&'static`-style identifiers supplied by this crate, not by callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// PostgreSQL rejects statements with more bind parameters than this.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// A positional statement argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// Malformed builder input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatementError {
    #[error("{table}: no columns declared")]
    NoColumns { table: String },

    #[error("select has no source table")]
    NoSource,

    #[error("{table}: no rows to insert")]
    NoRows { table: String },

    #[error("{table}: {values} values is not a multiple of {columns} columns")]
    ValueCount {
        table: String,
        columns: usize,
        values: usize,
    },

    #[error("{table}: update has no SET clauses")]
    EmptyUpdate { table: String },

    #[error("{params} bind parameters exceeds the limit of {max}")]
    TooManyParameters { params: usize, max: usize },
}

/// Built statement: SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    args: Vec<Value>,
}

impl Statement {
    /// Raw statement with no arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Accumulates arguments and hands out the next placeholder.
#[derive(Default)]
struct Args(Vec<Value>);

impl Args {
    fn push(&mut self, value: Value) -> String {
        self.0.push(value);
        format!("${}", self.0.len())
    }

    fn finish(self, sql: String) -> Result<Statement, StatementError> {
        if self.0.len() > MAX_BIND_PARAMS {
            return Err(StatementError::TooManyParameters {
                params: self.0.len(),
                max: MAX_BIND_PARAMS,
            });
        }
        Ok(Statement { sql, args: self.0 })
    }
}

/// Appends `WHERE a = $n AND b = $m` for equality predicates.
fn push_where(sql: &mut String, args: &mut Args, filters: Vec<(&str, Value)>) {
    for (i, (column, value)) in filters.into_iter().enumerate() {
        let keyword = if i == 0 { " WHERE " } else { " AND " };
        let placeholder = args.push(value);
        let _ = write!(sql, "{keyword}{column} = {placeholder}");
    }
}

/// `INSERT INTO table (cols) VALUES (...), (...)`
///
/// Values are supplied flat: `k * n` values for `k` columns and `n` rows.
#[derive(Debug, Clone)]
pub struct Insert<'a> {
    table: &'a str,
    columns: &'a [&'a str],
    values: Vec<Value>,
    suffix: Option<&'a str>,
}

impl<'a> Insert<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            columns: &[],
            values: Vec::new(),
            suffix: None,
        }
    }

    pub fn columns(mut self, columns: &'a [&'a str]) -> Self {
        self.columns = columns;
        self
    }

    /// Append values; call once per row or once with all rows flattened.
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.values.extend(values);
        self
    }

    /// Trailing clause such as `ON CONFLICT (id) DO NOTHING`.
    pub fn suffix(mut self, clause: &'a str) -> Self {
        if !clause.trim().is_empty() {
            self.suffix = Some(clause);
        }
        self
    }

    pub fn build(self) -> Result<Statement, StatementError> {
        let width = self.columns.len();
        if width == 0 {
            return Err(StatementError::NoColumns {
                table: self.table.to_owned(),
            });
        }
        if self.values.is_empty() {
            return Err(StatementError::NoRows {
                table: self.table.to_owned(),
            });
        }
        if self.values.len() % width != 0 {
            return Err(StatementError::ValueCount {
                table: self.table.to_owned(),
                columns: width,
                values: self.values.len(),
            });
        }

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ",
            self.table,
            self.columns.join(", ")
        );
        let mut args = Args::default();
        let mut values = self.values.into_iter().peekable();
        let mut first_row = true;
        while values.peek().is_some() {
            if !first_row {
                sql.push_str(", ");
            }
            first_row = false;
            let row: Vec<String> = values.by_ref().take(width).map(|v| args.push(v)).collect();
            let _ = write!(sql, "({})", row.join(", "));
        }
        if let Some(clause) = self.suffix {
            sql.push(' ');
            sql.push_str(clause.trim());
        }

        args.finish(sql)
    }
}

/// `UPDATE table SET a = $1, ... WHERE id = $n`
#[derive(Debug, Clone)]
pub struct Update<'a> {
    table: &'a str,
    sets: Vec<(&'a str, Value)>,
    filters: Vec<(&'a str, Value)>,
}

impl<'a> Update<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            sets: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn set(mut self, column: &'a str, value: impl Into<Value>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    /// Equality predicate; multiple predicates combine with AND.
    pub fn filter_eq(mut self, column: &'a str, value: impl Into<Value>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn build(self) -> Result<Statement, StatementError> {
        if self.sets.is_empty() {
            return Err(StatementError::EmptyUpdate {
                table: self.table.to_owned(),
            });
        }

        let mut args = Args::default();
        let assignments: Vec<String> = self
            .sets
            .into_iter()
            .map(|(column, value)| format!("{} = {}", column, args.push(value)))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        push_where(&mut sql, &mut args, self.filters);

        args.finish(sql)
    }
}

/// `SELECT cols FROM table [WHERE ...] [GROUP BY ...] [LIMIT n]`
#[derive(Debug, Clone)]
pub struct Select<'a> {
    columns: &'a [&'a str],
    from: Option<&'a str>,
    filters: Vec<(&'a str, Value)>,
    group_by: Vec<&'a str>,
    limit: Option<u64>,
}

impl<'a> Select<'a> {
    pub fn columns(columns: &'a [&'a str]) -> Self {
        Self {
            columns,
            from: None,
            filters: Vec::new(),
            group_by: Vec::new(),
            limit: None,
        }
    }

    pub fn from(mut self, table: &'a str) -> Self {
        self.from = Some(table);
        self
    }

    /// Equality predicate; multiple predicates combine with AND.
    pub fn filter_eq(mut self, column: &'a str, value: impl Into<Value>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn group_by(mut self, column: &'a str) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Statement, StatementError> {
        let table = self.from.ok_or(StatementError::NoSource)?;
        if self.columns.is_empty() {
            return Err(StatementError::NoColumns {
                table: table.to_owned(),
            });
        }

        let mut args = Args::default();
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), table);
        push_where(&mut sql, &mut args, self.filters);
        if !self.group_by.is_empty() {
            let _ = write!(sql, " GROUP BY {}", self.group_by.join(", "));
        }
        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }

        args.finish(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["id", "title", "is_display"];

    #[test]
    fn insert_single_row() {
        let stmt = Insert::new("questions")
            .columns(COLUMNS)
            .values([Value::from("A1B2C3D4"), "Quality".into(), true.into()])
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "INSERT INTO questions (id, title, is_display) VALUES ($1, $2, $3)"
        );
        assert_eq!(stmt.args().len(), 3);
        assert_eq!(stmt.args()[1], Value::Text("Quality".into()));
    }

    #[test]
    fn insert_numbers_placeholders_across_rows() {
        let stmt = Insert::new("feedback_remarks")
            .columns(&["id", "rating"])
            .values([
                Value::from("A"),
                Decimal::from(4).into(),
                "B".into(),
                Decimal::from(2).into(),
            ])
            .suffix("ON CONFLICT (id) DO NOTHING")
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "INSERT INTO feedback_remarks (id, rating) VALUES ($1, $2), ($3, $4) \
             ON CONFLICT (id) DO NOTHING"
        );
        assert_eq!(stmt.args()[2], Value::Text("B".into()));
    }

    #[test]
    fn insert_rejects_ragged_values() {
        let err = Insert::new("questions")
            .columns(COLUMNS)
            .values([Value::from("A"), "B".into()])
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            StatementError::ValueCount {
                table: "questions".into(),
                columns: 3,
                values: 2
            }
        );
    }

    #[test]
    fn insert_rejects_empty_input() {
        let no_rows = Insert::new("questions").columns(COLUMNS).build();
        assert!(matches!(no_rows, Err(StatementError::NoRows { .. })));

        let no_columns = Insert::new("questions").values([Value::from("A")]).build();
        assert!(matches!(no_columns, Err(StatementError::NoColumns { .. })));
    }

    #[test]
    fn insert_blank_suffix_is_ignored() {
        let stmt = Insert::new("t")
            .columns(&["id"])
            .values([Value::from("A")])
            .suffix("  ")
            .build()
            .unwrap();
        assert_eq!(stmt.sql(), "INSERT INTO t (id) VALUES ($1)");
    }

    #[test]
    fn insert_enforces_parameter_limit() {
        let values = (0..=MAX_BIND_PARAMS as i64).map(Value::from);
        let err = Insert::new("t")
            .columns(&["n"])
            .values(values)
            .build()
            .unwrap_err();
        assert!(matches!(err, StatementError::TooManyParameters { .. }));
    }

    #[test]
    fn update_places_predicate_after_assignments() {
        let stmt = Update::new("questions")
            .set("title", "Pace")
            .set("is_display", false)
            .filter_eq("id", "A1B2C3D4")
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE questions SET title = $1, is_display = $2 WHERE id = $3"
        );
        assert_eq!(stmt.args()[2], Value::Text("A1B2C3D4".into()));
    }

    #[test]
    fn predicates_combine_with_and() {
        let stmt = Select::columns(COLUMNS)
            .from("questions")
            .filter_eq("id", "X")
            .filter_eq("is_display", true)
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "SELECT id, title, is_display FROM questions WHERE id = $1 AND is_display = $2"
        );
    }

    #[test]
    fn update_without_assignments_fails() {
        let err = Update::new("questions").filter_eq("id", "X").build();
        assert!(matches!(err, Err(StatementError::EmptyUpdate { .. })));
    }

    #[test]
    fn select_with_limit() {
        let stmt = Select::columns(COLUMNS)
            .from("questions")
            .filter_eq("id", "X")
            .limit(1)
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "SELECT id, title, is_display FROM questions WHERE id = $1 LIMIT 1"
        );
        assert_eq!(stmt.args(), &[Value::Text("X".into())]);
    }

    #[test]
    fn select_with_grouping() {
        let stmt = Select::columns(&["teaching_id", "SUM(rating)/COUNT(id)"])
            .from("feedback_remarks")
            .group_by("teaching_id")
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "SELECT teaching_id, SUM(rating)/COUNT(id) FROM feedback_remarks GROUP BY teaching_id"
        );
        assert!(stmt.args().is_empty());
    }

    #[test]
    fn select_requires_source() {
        assert_eq!(
            Select::columns(COLUMNS).build(),
            Err(StatementError::NoSource)
        );
    }
}

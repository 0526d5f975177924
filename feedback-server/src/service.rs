//! Feedback service
//!
//! Question CRUD, bulk feedback ingestion and assessment aggregation.
//! Every operation is one request/response round against storage; SQL text
//! comes from the statement builder, never from here.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use crate::db::scan::{FEEDBACK_COLUMNS, FEEDBACK_TABLE, QUESTIONS_TABLE};
use crate::db::{
    new_id, Db, DbError, IdError, Insert, ScanRow, Select, Update, Value, MAX_BIND_PARAMS,
};
use crate::models::{Assessment, Feedback, Question, Questions, ValidationError};

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unknown question '{id}'")]
    QuestionUnknown { id: String },

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Id(#[from] IdError),
}

/// Largest feedback batch that fits in one insert statement.
pub const MAX_FEEDBACK_BATCH: usize = MAX_BIND_PARAMS / FEEDBACK_COLUMNS.len();

/// PostgreSQL stores microseconds; trim so returned values match stored ones.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Feedback service over a shared [`Db`] handle.
#[derive(Debug, Clone)]
pub struct FeedbackService {
    db: Db,
}

impl FeedbackService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// All questions. No ordering is imposed.
    pub async fn list_questions(&self) -> Result<Questions, ServiceError> {
        let stmt = Select::columns(Question::COLUMNS)
            .from(QUESTIONS_TABLE)
            .build()
            .map_err(DbError::from)?;
        let questions = self.db.fetch_all::<Question>(&stmt).await?;
        Ok(Questions::from(questions))
    }

    /// Create a question with a fresh id and timestamp.
    pub async fn create_question(
        &self,
        title: String,
        enabled: bool,
    ) -> Result<Question, ServiceError> {
        let question = Question::new(new_id()?, title, enabled, now());
        let stmt = Insert::new(QUESTIONS_TABLE)
            .columns(Question::COLUMNS)
            .values([
                Value::from(question.id.as_str()),
                question.title.as_str().into(),
                question.enabled.into(),
                question.updated_by.as_str().into(),
                question.updated_at.into(),
            ])
            .build()
            .map_err(DbError::from)?;

        self.db.execute(&stmt).await?;
        info!(id = %question.id, "question created");
        Ok(question)
    }

    /// Edit title/enabled of an existing question.
    ///
    /// `updated_by` is cleared and `updated_at` refreshed on every edit.
    pub async fn update_question(
        &self,
        id: &str,
        title: String,
        enabled: bool,
    ) -> Result<Question, ServiceError> {
        let mut question = self.find_question(id).await?;
        question.edit(title, enabled, now());

        let stmt = Update::new(QUESTIONS_TABLE)
            .set("title", question.title.as_str())
            .set("is_display", question.enabled)
            .set("updated_by", question.updated_by.as_str())
            .set("updated_at", question.updated_at)
            .filter_eq("id", question.id.as_str())
            .build()
            .map_err(DbError::from)?;

        if self.db.execute(&stmt).await? == 0 {
            // Row vanished between lookup and write.
            return Err(ServiceError::QuestionUnknown { id: id.to_owned() });
        }
        info!(id = %question.id, "question updated");
        Ok(question)
    }

    async fn find_question(&self, id: &str) -> Result<Question, ServiceError> {
        let stmt = Select::columns(Question::COLUMNS)
            .from(QUESTIONS_TABLE)
            .filter_eq("id", id)
            .limit(1)
            .build()
            .map_err(DbError::from)?;

        match self.db.query_row(&stmt).await?.scan::<Question>() {
            Err(DbError::NoRows) => Err(ServiceError::QuestionUnknown { id: id.to_owned() }),
            other => Ok(other?),
        }
    }

    /// Store a batch of feedback with one multi-row insert.
    ///
    /// The whole batch is validated first; any invalid element rejects the
    /// batch before storage is touched, as does a batch larger than
    /// [`MAX_FEEDBACK_BATCH`]. Caller-supplied ids are replaced.
    /// Returns the number of rows inserted.
    pub async fn bulk_ingest_feedback(&self, batch: Vec<Feedback>) -> Result<u64, ServiceError> {
        if batch.len() > MAX_FEEDBACK_BATCH {
            return Err(ValidationError::TooMany {
                field: "assessments",
                max: MAX_FEEDBACK_BATCH,
            }
            .into());
        }
        for (index, feedback) in batch.iter().enumerate() {
            feedback.validate().map_err(|source| ValidationError::Item {
                index,
                source: Box::new(source),
            })?;
        }
        if batch.is_empty() {
            debug!("empty feedback batch");
            return Ok(0);
        }

        let mut values = Vec::with_capacity(batch.len() * FEEDBACK_COLUMNS.len());
        for feedback in batch {
            values.extend([
                Value::from(new_id()?),
                feedback.teaching_id.into(),
                feedback.question_id.into(),
                feedback.rating.into(),
            ]);
        }

        let inserted = self
            .db
            .bulk_insert(FEEDBACK_TABLE, FEEDBACK_COLUMNS, values, "")
            .await?;
        info!(rows = inserted, "feedback batch stored");
        Ok(inserted)
    }

    /// Mean rating per teaching, recomputed on every call.
    pub async fn list_assessments(&self) -> Result<Vec<Assessment>, ServiceError> {
        let stmt = Select::columns(Assessment::COLUMNS)
            .from(FEEDBACK_TABLE)
            .group_by("teaching_id")
            .build()
            .map_err(DbError::from)?;
        Ok(self.db.fetch_all::<Assessment>(&stmt).await?)
    }
}

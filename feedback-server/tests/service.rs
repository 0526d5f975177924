//! Service tests against a live PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p feedback-server -- --ignored
//!
//! Each test gets its own schema so tests can run in parallel.

use std::str::FromStr;

use futures::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use feedback_server::db::{new_id, ScanRow, Select, Statement};
use feedback_server::models::{Feedback, Question};
use feedback_server::{Db, FeedbackService, ServiceError};

const SCHEMA_SQL: &[&str] = &[
    "CREATE TABLE questions (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        is_display BOOLEAN NOT NULL,
        updated_by TEXT NOT NULL DEFAULT '',
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE feedback_remarks (
        id TEXT PRIMARY KEY,
        teaching_id TEXT NOT NULL,
        question_id TEXT NOT NULL,
        rating NUMERIC NOT NULL
    )",
];

async fn fresh_service() -> FeedbackService {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let schema = format!("feedback_test_{}", new_id().unwrap().to_lowercase());

    let admin = PgPoolOptions::new().connect(&url).await.expect("connect");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .expect("create schema");
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .expect("valid url")
        .options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("connect");

    let db = Db::from_pool(pool);
    for sql in SCHEMA_SQL {
        db.execute(&Statement::raw(*sql)).await.expect("create table");
    }
    FeedbackService::new(db)
}

#[tokio::test]
#[ignore = "requires database"]
async fn created_question_is_listed() {
    let service = fresh_service().await;
    let created = service
        .create_question("Quality".into(), true)
        .await
        .unwrap();

    let questions = service.list_questions().await.unwrap();
    assert_eq!(questions.len(), 1);

    let listed = questions.iter().next().unwrap();
    assert_eq!(listed.title, "Quality");
    assert!(listed.enabled);
    assert!(!listed.id.is_empty());
    assert_eq!(listed, &created);
}

#[tokio::test]
#[ignore = "requires database"]
async fn enabled_filter_excludes_disabled_questions() {
    let service = fresh_service().await;
    service.create_question("Shown".into(), true).await.unwrap();
    service.create_question("Hidden".into(), false).await.unwrap();

    let all = service.list_questions().await.unwrap();
    assert_eq!(all.len(), 2);

    let enabled = all.enabled();
    assert_eq!(enabled.len(), 1);
    assert!(enabled.iter().all(|q| q.title == "Shown"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_unknown_question_is_not_found_and_writes_nothing() {
    let service = fresh_service().await;
    let existing = service.create_question("Quality".into(), true).await.unwrap();

    let err = service
        .update_question("FFFFFFFF", "Changed".into(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::QuestionUnknown { ref id } if id == "FFFFFFFF"));

    let questions = service.list_questions().await.unwrap().into_inner();
    assert_eq!(questions, vec![existing]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_edits_title_and_flag() {
    let service = fresh_service().await;
    let created = service.create_question("Quality".into(), true).await.unwrap();

    let updated = service
        .update_question(&created.id, "Pace".into(), false)
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Pace");
    assert!(!updated.enabled);
    assert!(updated.updated_by.is_empty());
    assert!(updated.updated_at >= created.updated_at);

    let stored = service.list_questions().await.unwrap().into_inner();
    assert_eq!(stored, vec![updated]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn assessment_is_mean_rating_per_teaching() {
    let service = fresh_service().await;
    let inserted = service
        .bulk_ingest_feedback(vec![
            Feedback::new("T1", "Q1", Decimal::from(4)),
            Feedback::new("T1", "Q1", Decimal::from(2)),
            Feedback::new("T2", "Q1", Decimal::from(5)),
        ])
        .await
        .unwrap();
    assert_eq!(inserted, 3);

    let mut assessments = service.list_assessments().await.unwrap();
    assessments.sort_by(|a, b| a.teaching_id.cmp(&b.teaching_id));

    assert_eq!(assessments.len(), 2);
    assert_eq!(assessments[0].teaching_id, "T1");
    assert_eq!(assessments[0].rating, Decimal::from(3));
    assert_eq!(assessments[1].rating, Decimal::from(5));
}

#[tokio::test]
#[ignore = "requires database"]
async fn fractional_ratings_average_exactly() {
    let service = fresh_service().await;
    service
        .bulk_ingest_feedback(vec![
            Feedback::new("T1", "Q1", Decimal::new(1, 1)),
            Feedback::new("T1", "Q2", Decimal::new(2, 1)),
            Feedback::new("T1", "Q3", Decimal::new(3, 1)),
        ])
        .await
        .unwrap();

    let assessments = service.list_assessments().await.unwrap();
    assert_eq!(assessments.len(), 1);
    assert_eq!(assessments[0].rating, Decimal::new(2, 1));
    assert_eq!(assessments[0].rating.normalize().to_string(), "0.2");
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_batch_inserts_nothing() {
    let service = fresh_service().await;
    assert_eq!(service.bulk_ingest_feedback(Vec::new()).await.unwrap(), 0);
    assert!(service.list_assessments().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_creates_get_distinct_ids() {
    let service = fresh_service().await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.create_question(format!("q{i}"), true).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task panicked").expect("create failed");
    }

    let mut ids: Vec<_> = service
        .list_questions()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
#[ignore = "requires database"]
async fn stream_yields_scanned_rows() {
    let service = fresh_service().await;
    service.create_question("A".into(), true).await.unwrap();
    service.create_question("B".into(), false).await.unwrap();

    let stmt = Select::columns(Question::COLUMNS)
        .from("questions")
        .filter_eq("is_display", true)
        .build()
        .unwrap();
    let rows: Vec<Question> = service.db().stream(&stmt).try_collect().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "A");
}

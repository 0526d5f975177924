//! Database handle
//!
//! The only code that talks to PostgreSQL. Every operation takes a built
//! [`Statement`], binds its arguments positionally and runs it against the
//! pool. No transaction is held open across calls.
//!
//! Cancellation: dropping any returned future aborts the statement and
//! returns the connection to the pool. An optional per-statement deadline
//! turns slow statements into [`DbError::Timeout`].

use std::future::Future;
use std::time::Duration;

use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use tracing::{debug, info};

use super::error::DbError;
use super::pool::{create_pool, DbConfig};
use super::scan::ScanRow;
use super::statement::{Insert, Statement, Value};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind a statement's arguments in declaration order.
fn prepare(stmt: &Statement) -> PgQuery<'_> {
    stmt.args()
        .iter()
        .fold(sqlx::query(stmt.sql()), |query, arg| match arg {
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::Decimal(v) => query.bind(*v),
            Value::Timestamp(v) => query.bind(*v),
        })
}

/// Result of a single-row lookup.
#[derive(Debug)]
pub struct Row(Option<PgRow>);

impl Row {
    /// Scan the row into `T`; fails with [`DbError::NoRows`] if nothing matched.
    pub fn scan<T: ScanRow>(self) -> Result<T, DbError> {
        let row = self.0.ok_or(DbError::NoRows)?;
        Ok(T::scan(&row)?)
    }
}

/// Shared handle over the connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    statement_timeout: Option<Duration>,
}

impl Db {
    /// Connect eagerly so a bad descriptor fails at startup.
    pub async fn open(config: &DbConfig) -> Result<Self, DbError> {
        let pool = create_pool(config).await?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            max_connections = config.max_connections,
            "database pool opened"
        );
        Ok(Self {
            pool,
            statement_timeout: config.statement_timeout,
        })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            statement_timeout: None,
        }
    }

    pub fn with_statement_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.statement_timeout = timeout;
        self
    }

    async fn deadline<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match self.statement_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| DbError::Timeout(limit))?,
            None => fut.await,
        }
    }

    /// Run a statement with no result set; returns rows affected.
    pub async fn execute(&self, stmt: &Statement) -> Result<u64, DbError> {
        debug!(sql = stmt.sql(), args = stmt.args().len(), "execute");
        self.deadline(async {
            let done = prepare(stmt).execute(&self.pool).await?;
            Ok::<_, DbError>(done.rows_affected())
        })
        .await
    }

    /// Run a statement expected to return at most one row.
    pub async fn query_row(&self, stmt: &Statement) -> Result<Row, DbError> {
        debug!(sql = stmt.sql(), args = stmt.args().len(), "query_row");
        self.deadline(async {
            let row = prepare(stmt).fetch_optional(&self.pool).await?;
            Ok::<_, DbError>(Row(row))
        })
        .await
    }

    /// Feed every result row to `consumer` in result-set order.
    ///
    /// Stops at the first consumer or driver error and returns it. The row
    /// stream, and with it the connection, is released on every exit path.
    pub async fn run_query<F>(&self, stmt: &Statement, mut consumer: F) -> Result<(), DbError>
    where
        F: FnMut(PgRow) -> Result<(), DbError>,
    {
        debug!(sql = stmt.sql(), args = stmt.args().len(), "run_query");
        self.deadline(async {
            let mut rows = prepare(stmt).fetch(&self.pool);
            while let Some(row) = rows.try_next().await? {
                consumer(row)?;
            }
            Ok::<_, DbError>(())
        })
        .await
    }

    /// Collect every row as `T`.
    pub async fn fetch_all<T: ScanRow>(&self, stmt: &Statement) -> Result<Vec<T>, DbError> {
        let mut items = Vec::new();
        self.run_query(stmt, |row| {
            items.push(T::scan(&row)?);
            Ok(())
        })
        .await?;
        Ok(items)
    }

    /// Lazy, single-pass stream of `T`. Dropping it early releases the
    /// connection. The statement deadline does not apply here.
    pub fn stream<'a, T>(&'a self, stmt: &'a Statement) -> BoxStream<'a, Result<T, DbError>>
    where
        T: ScanRow + Send + 'a,
    {
        debug!(sql = stmt.sql(), args = stmt.args().len(), "stream");
        prepare(stmt)
            .fetch(&self.pool)
            .map(|row| -> Result<T, DbError> {
                let row = row?;
                Ok(T::scan(&row)?)
            })
            .boxed()
    }

    /// Insert `values.len() / columns.len()` rows with one statement.
    ///
    /// `values` is flat, row-major. An empty batch is a no-op. The
    /// `on_conflict` clause is appended verbatim and must be trusted text.
    pub async fn bulk_insert(
        &self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
        on_conflict: &str,
    ) -> Result<u64, DbError> {
        if values.is_empty() {
            debug!(table, "bulk insert with no rows, skipping");
            return Ok(0);
        }

        let rows = values.len() / columns.len().max(1);
        let stmt = Insert::new(table)
            .columns(columns)
            .values(values)
            .suffix(on_conflict)
            .build()?;

        debug!(table, rows, "bulk insert");
        self.execute(&stmt).await
    }

    /// Close the pool, waiting for checked-out connections to return.
    ///
    /// Consumes the handle. Fails if the shared pool was already closed
    /// through another clone.
    pub async fn close(self) -> Result<(), DbError> {
        if self.pool.is_closed() {
            return Err(DbError::Closed);
        }
        self.pool.close().await;
        info!("database pool closed");
        Ok(())
    }
}

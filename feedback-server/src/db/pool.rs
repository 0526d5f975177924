//! Connection configuration and pool creation
//!
//! Uses sqlx PgPool with explicit connection limits. The configuration is
//! built once at startup and handed to [`Db::open`](super::Db::open).

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection descriptor for the feedback database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Session time zone, sent as the `TimeZone` startup option.
    pub time_zone: String,
    pub max_connections: u32,
    /// Per-statement deadline enforced by the handle (`None` = wait forever).
    pub statement_timeout: Option<Duration>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5455,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            time_zone: "Asia/Vientiane".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            statement_timeout: None,
        }
    }
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("time_zone", &self.time_zone)
            .field("max_connections", &self.max_connections)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

impl DbConfig {
    /// Driver connect options. Empty user/password/database fall back to
    /// libpq defaults (`PGUSER` and friends).
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .ssl_mode(PgSslMode::Disable)
            .options([("TimeZone", self.time_zone.as_str())]);

        if !self.user.is_empty() {
            options = options.username(&self.user);
        }
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if !self.database.is_empty() {
            options = options.database(&self.database);
        }
        options
    }
}

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the first connection fails.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await
}

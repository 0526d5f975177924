//! HTTP server command
//!
//! Opens the database handle, serves the API until Ctrl+C/SIGTERM, then
//! closes the handle exactly once.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use feedback_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use feedback_server::{run_server, Db, DbConfig, FeedbackService, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:3001")]
    pub bind: SocketAddr,

    /// Port override (keeps the bind address host)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5455)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "")]
    pub db_name: String,

    /// Session time zone
    #[arg(long, env = "TZ", default_value = "Asia/Vientiane")]
    pub time_zone: String,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Abort statements running longer than this many seconds
    #[arg(long)]
    pub statement_timeout_secs: Option<u64>,
}

impl ServeArgs {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            time_zone: self.time_zone.clone(),
            max_connections: self.max_connections,
            statement_timeout: self.statement_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        let mut bind_addr = self.bind;
        if let Some(port) = self.port {
            bind_addr.set_port(port);
        }
        ServerConfig {
            bind_addr,
            cors_permissive: self.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.db_config();
    let server_config = args.server_config();
    tracing::debug!(?db_config, "database configuration");

    let db = Db::open(&db_config)
        .await
        .context("failed to open database")?;

    let served = run_server(FeedbackService::new(db.clone()), server_config).await;

    // Close even if the server failed; report both.
    let closed = db.close().await.context("failed to close database");
    served.context("server error")?;
    closed?;

    Ok(())
}

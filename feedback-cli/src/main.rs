//! feedback CLI - entry point for the feedback collection backend

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "feedback",
    author,
    version,
    about = "Survey questions, bulk feedback ratings and per-teaching assessments"
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
    };

    if let Err(err) = &result {
        tracing::error!("{:#}", err);
    }
    result
}

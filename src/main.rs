//! Spreadsheet-backed shortcut redirector (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                SHEET REDIRECT                │
//!   GET /team/docs       │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ─────────────────────┼─▶│  http  │──▶│ sheets  │──▶│  shortcuts  │  │
//!                        │  │ server │   │ client  │   │ build+match │  │
//!                        │  └────────┘   └────┬────┘   └──────┬──────┘  │
//!   301 Location: ...    │       ▲            │               │         │
//!   ◀────────────────────┼───────┴────────────┼───────────────┘         │
//!                        │                    ▼                         │
//!                        │          Google Sheets values API            │
//!                        │                                              │
//!                        │  config · observability · resilience ·       │
//!                        │  lifecycle                                   │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use sheet_redirect::config::loader::load_from_env;
use sheet_redirect::lifecycle::startup;
use sheet_redirect::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "sheet-redirect")]
#[command(about = "Redirect request paths using a shortcut table kept in a spreadsheet", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "SHEET_REDIRECT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_from_env(args.config.as_deref())?;

    init_logging(&config.observability.log_level)?;

    tracing::info!("sheet-redirect v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        spreadsheet_id = %config.sheet.spreadsheet_id,
        range = %config.sheet.range,
        fold_path_case = config.resolver.fold_path_case,
        redirect_status = config.resolver.redirect_status,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

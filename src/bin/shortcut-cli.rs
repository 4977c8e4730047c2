use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use sheet_redirect::config::loader::load_from_env;
use sheet_redirect::observability::logging::init_logging;
use sheet_redirect::sheets::SheetsClient;
use sheet_redirect::shortcuts::{self, MatchOptions, PathResolver, Resolution};

#[derive(Parser)]
#[command(name = "shortcut-cli")]
#[command(about = "Inspect the shortcut sheet used by sheet-redirect", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "SHEET_REDIRECT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request path and print the redirect target
    Resolve {
        /// Request path, e.g. /team/docs
        path: String,
        /// Match the path case-sensitively regardless of configuration
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Print the built shortcut table and any diagnostics
    Table,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_from_env(cli.config.as_deref())?;
    init_logging(&config.observability.log_level)?;

    let client = SheetsClient::new(&config)?;
    let report = shortcuts::build(client.fetch().await?);

    match cli.command {
        Commands::Resolve { path, case_sensitive } => {
            let resolver = PathResolver::new(MatchOptions {
                fold_case: config.resolver.fold_path_case && !case_sensitive,
            });
            match resolver.resolve(&report.table, &path) {
                Resolution::Found { key, target } => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "path": path,
                        "key": key,
                        "target": target,
                    }))?);
                    Ok(ExitCode::SUCCESS)
                }
                Resolution::NotFound => {
                    eprintln!("No shortcut matches '{}'", path);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Table => {
            let entries: BTreeMap<&str, _> = report.table.iter().collect();
            let diagnostics: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
            println!("{}", serde_json::to_string_pretty(&json!({
                "entries": entries,
                "skipped_rows": report.skipped,
                "diagnostics": diagnostics,
            }))?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

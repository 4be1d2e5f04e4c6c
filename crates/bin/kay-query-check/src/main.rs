//! Preflight checklist for the kay-query database connection.
//!
//! Run this against a connection string before handing it to an assistant
//! client. It checks connectivity, read access, that writes are refused,
//! the sample queries, and whether vector search is available.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use kay_core::preflight::{Preflight, PreflightError, PreflightReport};
use kay_core::store::{PgKayStore, PgStoreOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: DATABASE_URL=\"postgresql://...\" kay-query-check";

#[derive(Parser, Debug)]
#[command(
    name = "kay-query-check",
    version,
    about = "Preflight checklist for the kay-query database role."
)]
struct CliArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[arg(long = "log", env = "KAY_LOG", default_value = "warn")]
    log_filter: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter);

    let Some(database_url) = args.database_url.filter(|value| !value.trim().is_empty()) else {
        eprintln!("❌ DATABASE_URL not set");
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let options = PgStoreOptions::new(database_url).with_max_connections(1);
    let store = match PgKayStore::connect(&options).await {
        Ok(store) => store,
        Err(err) => return report_failure(&PreflightError::Connection(err)),
    };

    let mut preflight = Preflight::new(&store, io::stdout());
    let outcome = preflight.run().await;
    let connected = preflight.connected();
    store.close().await;

    conclude(&outcome, connected)
}

/// Exit status for a finished run. Losing stdout only counts as success once
/// the database has answered the connectivity step.
fn conclude(outcome: &Result<PreflightReport, PreflightError>, connected: bool) -> ExitCode {
    match outcome {
        Ok(report) => {
            info!(clean = report.is_clean(), "checklist finished");
            ExitCode::SUCCESS
        }
        Err(err @ PreflightError::Connection(_)) => report_failure(err),
        Err(err @ PreflightError::Io(_)) if connected => {
            warn!(error = %err, "checklist output interrupted after connecting");
            ExitCode::SUCCESS
        }
        Err(err @ PreflightError::Io(_)) => {
            eprintln!("❌ Checklist stopped before connectivity was verified: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report_failure(err: &PreflightError) -> ExitCode {
    eprintln!("\n❌ TEST FAILED: {err}");
    eprintln!("\nCheck:");
    eprintln!("- DATABASE_URL is correct");
    eprintln!("- Database user has SELECT permissions");
    eprintln!("- Network allows connection to database\n");
    ExitCode::FAILURE
}

/// Diagnostics go to stderr so the checklist on stdout stays readable.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

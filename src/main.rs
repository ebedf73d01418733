//! Supabase schema tools - main entry point.
//!
//! `dump-schema` exports the database schema with pg_dump;
//! `test-connection` checks the session pooler with two diagnostic queries.

use clap::Parser;
use std::process::ExitCode;
use supabase_schema_tools::commands;
use supabase_schema_tools::config::{Cli, Command, Config};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and stay off unless `--enable-logs` or `RUST_LOG` asks for them,
/// so stdout carries only the command's report.
fn init_tracing(config: &Config) {
    let from_env = EnvFilter::try_from_default_env().ok();
    if from_env.is_none() && !config.enable_logs {
        return;
    }
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Variables already set in the environment win over .env entries
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.config);

    match &dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    info!(
        command = ?cli.command,
        "Starting supabase-schema-tools v{}",
        env!("CARGO_PKG_VERSION")
    );

    let lookup = |key: &str| std::env::var(key).ok();
    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Command::DumpSchema => commands::dump_schema(&cli.config, lookup, &mut stdout).await,
        Command::TestConnection => {
            commands::test_connection(&cli.config, lookup, &mut stdout).await
        }
    };

    // Failures the commands reported themselves keep the default exit status;
    // only configuration errors exit non-zero.
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

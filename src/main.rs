//! Mrscribe CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use mrscribe::{IntakeError, MrScribeConfig};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

const DEFAULT_LOG_FILTER: &str = "mrscribe=info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    cli::aggregate::run(&config).await
}

/// Installs a stderr subscriber filtered by `RUST_LOG`.
///
/// Stdout is left to exports and reports.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<MrScribeConfig, IntakeError> {
    MrScribeConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

//! acecap
//!
//! Captures one verification frame from every stream of a playlist chunk,
//! scores it for black screens and blur, and writes a per-chunk JSON report.
//!
//! # Usage
//!
//! ```bash
//! acecap --playlist channels.m3u
//! acecap --chunk 2 --total-chunks 4 --report-dir reports
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use acecap_cli::cli::{commands, Cli};
use acecap_cli::utils::logging::{LoggingConfig, LoggingSystem};

/// Main entry point for the acecap CLI
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingSystem::new(LoggingConfig {
        level: cli.log_level,
        format: cli.log_format,
        ..LoggingConfig::default()
    });
    logging.initialize();
    logging.log_system_info();

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

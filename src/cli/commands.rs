//! Command implementations

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::RunOutcome;
use crate::cli::Cli;
use crate::config_initialization::{initialize_configuration_hierarchy, ResolvedConfig};
use crate::domain::errors::DomainError;
use crate::domain::rules::GateOutcome;
use crate::error::AcecapError;
use crate::utils::format_elapsed;

/// Execute a chunk run; the exit code reflects the quality gate
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let started = Instant::now();

    let resolved = initialize_configuration_hierarchy(&cli).context("Invalid configuration")?;
    let container =
        DefaultAppContainer::new(&resolved.pipeline).context("Failed to initialize pipeline")?;

    wait_for_engine(&container, &resolved).await?;

    let playlist_path = &resolved.pipeline.playlist_path;
    let channels = container
        .playlist_port()
        .load_channels(playlist_path)
        .await
        .map_err(|e| match e {
            DomainError::FileNotFound(_) => AcecapError::PlaylistNotFound {
                path: playlist_path.display().to_string(),
            },
            other => other.into(),
        })?;
    if channels.is_empty() {
        return Err(AcecapError::EmptyPlaylist {
            path: playlist_path.display().to_string(),
        }
        .into());
    }
    info!(
        "Loaded {} channels from {}",
        channels.len(),
        playlist_path.display()
    );

    let outcome = container
        .pipeline_interactor()
        .run(&channels, resolved.chunk)
        .await
        .map_err(AcecapError::from)
        .context("Pipeline run failed")?;

    print_summary(&outcome, started);

    Ok(match outcome.gate {
        GateOutcome::Passed { .. } => ExitCode::SUCCESS,
        GateOutcome::EmptyChunk => {
            warn!("Chunk {} selected no channels", resolved.chunk);
            ExitCode::SUCCESS
        }
        GateOutcome::Failed { success_rate } => {
            warn!(
                "Success rate {:.1}% is below the {:.1}% threshold",
                success_rate, resolved.pipeline.success_threshold
            );
            println!(
                "WARNING: success rate below {:.1}%",
                resolved.pipeline.success_threshold
            );
            ExitCode::FAILURE
        }
    })
}

async fn wait_for_engine(container: &DefaultAppContainer, resolved: &ResolvedConfig) -> Result<()> {
    let (Some(engine), Some(url)) = (
        container.engine_interactor(),
        resolved.pipeline.engine_health_url.as_deref(),
    ) else {
        return Ok(());
    };

    let budget = resolved.pipeline.engine_health_timeout;
    if engine
        .wait_until_ready(budget, resolved.pipeline.engine_poll_interval)
        .await
    {
        Ok(())
    } else {
        Err(AcecapError::EngineNotReady {
            url: url.to_string(),
            waited_secs: budget.as_secs(),
        }
        .into())
    }
}

fn print_summary(outcome: &RunOutcome, started: Instant) {
    let report = &outcome.report;
    info!(
        chunk = %report.chunk,
        processed = report.total_channels,
        successful = report.successful_captures,
        "Chunk finished"
    );

    println!("Chunk {} finished in {}", report.chunk, format_elapsed(started.elapsed()));
    println!("Channels processed: {}", report.total_channels);
    println!(
        "Successful captures: {} ({:.1}%)",
        report.successful_captures,
        outcome.success_rate()
    );
    println!("Average quality: {:.2}", report.average_quality);
    println!("Report: {}", outcome.report_path.display());

    for path in &outcome.retained_artifacts {
        error!(path = %path.display(), "Black-screen capture could not be removed");
        println!("ERROR: black-screen capture left on disk: {}", path.display());
    }
}

//! Configuration initialization and hierarchy management

use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::cli::Cli;
use crate::domain::model::{ChunkSpec, PipelineConfig};
use crate::error::{AcecapError, AcecapResult};

/// Everything a run needs once flags, environment and file are merged
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub pipeline: PipelineConfig,
    pub chunk: ChunkSpec,
}

/// Resolve configuration following precedence: CLI > Env > File > Defaults
///
/// Environment variables arrive through clap's `env` attributes, so they are
/// already folded into `cli`.
pub fn initialize_configuration_hierarchy(cli: &Cli) -> AcecapResult<ResolvedConfig> {
    let mut pipeline = PipelineConfig::default();

    if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
        let section = TomlConfigAdapter::load(path).map_err(config_error)?;
        section.apply_to(&mut pipeline).map_err(config_error)?;
    }

    let overrides = apply_cli_overrides(cli, &mut pipeline);
    if overrides > 0 {
        debug!("Applied {} command-line overrides", overrides);
    }

    pipeline.validate().map_err(config_error)?;
    let chunk = ChunkSpec::new(cli.chunk, cli.total_chunks).map_err(config_error)?;

    Ok(ResolvedConfig { pipeline, chunk })
}

fn config_error(e: impl std::fmt::Display) -> AcecapError {
    AcecapError::ConfigError {
        message: e.to_string(),
    }
}

/// Overlay flags that were given; returns how many applied
fn apply_cli_overrides(cli: &Cli, config: &mut PipelineConfig) -> usize {
    let mut applied = 0;
    if let Some(path) = &cli.playlist {
        config.playlist_path = path.clone();
        applied += 1;
    }
    if let Some(dir) = &cli.screenshots_dir {
        config.screenshots_dir = dir.clone();
        applied += 1;
    }
    if let Some(dir) = &cli.logos_dir {
        config.logos_dir = dir.clone();
        applied += 1;
    }
    if let Some(dir) = &cli.report_dir {
        config.report_dir = dir.clone();
        applied += 1;
    }
    if let Some(secs) = cli.timeout {
        config.capture_timeout = Duration::from_secs(secs);
        applied += 1;
    }
    if let Some(retries) = cli.max_retries {
        config.max_retries = retries;
        applied += 1;
    }
    if let Some(secs) = cli.retry_delay {
        config.retry_delay = Duration::from_secs(secs);
        applied += 1;
    }
    if let Some(secs) = cli.settle_delay {
        config.settle_delay = Duration::from_secs(secs);
        applied += 1;
    }
    if let Some(threshold) = cli.success_threshold {
        config.success_threshold = threshold;
        applied += 1;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.ffmpeg_path = ffmpeg.clone();
        applied += 1;
    }
    if let Some(url) = &cli.engine_health_url {
        config.engine_health_url = Some(url.clone());
        applied += 1;
    }

    applied
}

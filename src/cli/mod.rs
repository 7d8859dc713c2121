//! CLI module for acecap
//!
//! This module handles command-line argument parsing and the run command.

use std::path::PathBuf;

use clap::Parser;
use clap_num::number_range;

use crate::ports::LogLevel;
use crate::utils::logging::LogFormat;

pub mod commands;

/// Stream capture and quality validation
///
/// Captures one verification frame per channel of a playlist chunk, scores it,
/// and writes `report_chunk_<n>.json`. Exits 1 when fewer than the configured
/// share of channels captured successfully.
#[derive(Parser, Debug)]
#[command(name = "acecap")]
#[command(about = "Capture and validate IPTV/Acestream channel streams")]
#[command(version)]
pub struct Cli {
    /// Chunk to process (1-based)
    #[arg(long, default_value_t = 1, value_parser = at_least_one, env = "ACECAP_CHUNK")]
    pub chunk: u32,

    /// Number of chunks the playlist is split into
    #[arg(long, default_value_t = 1, value_parser = at_least_one, env = "ACECAP_TOTAL_CHUNKS")]
    pub total_chunks: u32,

    /// M3U playlist to read channels from
    #[arg(long, env = "ACECAP_PLAYLIST")]
    pub playlist: Option<PathBuf>,

    /// TOML config file with a [pipeline] table
    #[arg(long, env = "ACECAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for screenshots (cleared at start)
    #[arg(long, env = "ACECAP_SCREENSHOTS_DIR")]
    pub screenshots_dir: Option<PathBuf>,

    /// Directory for channel logos
    #[arg(long, env = "ACECAP_LOGOS_DIR")]
    pub logos_dir: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(long, env = "ACECAP_REPORT_DIR")]
    pub report_dir: Option<PathBuf>,

    /// Capture timeout per attempt, in seconds
    #[arg(long, value_parser = timeout_secs, env = "ACECAP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Capture attempts per channel
    #[arg(long, value_parser = retries, env = "ACECAP_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Base retry delay in seconds (attempt n waits n times this)
    #[arg(long, env = "ACECAP_RETRY_DELAY")]
    pub retry_delay: Option<u64>,

    /// Seconds of stream to skip before grabbing the frame
    #[arg(long, env = "ACECAP_SETTLE_DELAY")]
    pub settle_delay: Option<u64>,

    /// Minimum success rate (percent) for a zero exit code
    #[arg(long, env = "ACECAP_SUCCESS_THRESHOLD")]
    pub success_threshold: Option<f64>,

    /// ffmpeg binary
    #[arg(long, env = "ACECAP_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// Streaming engine URL polled for HTTP 200 before capturing
    #[arg(long, env = "ACECAP_ENGINE_HEALTH_URL")]
    pub engine_health_url: Option<String>,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = log_level, env = "ACECAP_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "ACECAP_LOG_FORMAT")]
    pub log_format: LogFormat,
}

fn at_least_one(s: &str) -> Result<u32, String> {
    number_range(s, 1, u32::MAX)
}

fn timeout_secs(s: &str) -> Result<u64, String> {
    number_range(s, 1, 3600)
}

fn retries(s: &str) -> Result<u32, String> {
    number_range(s, 1, 100)
}

fn log_level(s: &str) -> Result<LogLevel, String> {
    s.parse::<LogLevel>().map_err(|e| e.to_string())
}

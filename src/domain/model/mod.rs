// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::path::safe_filename;


/// One playlist entry: channel metadata plus its live-stream URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub logo_url: String,
    pub channel_id: String,
    pub channel_name: String,
    pub stream_url: String,
    pub stream_id: String,
}

impl ChannelDescriptor {
    /// Create a descriptor, deriving the stream id from the stream URL
    pub fn new(
        logo_url: impl Into<String>,
        channel_id: impl Into<String>,
        channel_name: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Self {
        let stream_url = stream_url.into();
        let stream_id = Self::extract_stream_id(&stream_url);
        Self {
            logo_url: logo_url.into(),
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            stream_url,
            stream_id,
        }
    }

    /// Text after the last `=` of the URL, or the whole URL when it has none
    pub fn extract_stream_id(stream_url: &str) -> String {
        stream_url
            .rsplit('=')
            .next()
            .unwrap_or(stream_url)
            .to_string()
    }
}

/// Which slice of the full channel list this run owns (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    chunk: u32,
    total_chunks: u32,
}

impl ChunkSpec {
    /// Create a validated chunk specification
    pub fn new(chunk: u32, total_chunks: u32) -> Result<Self, DomainError> {
        if total_chunks == 0 {
            return Err(DomainError::BadArgs(
                "total chunks must be at least 1".to_string(),
            ));
        }
        if chunk == 0 || chunk > total_chunks {
            return Err(DomainError::BadArgs(format!(
                "chunk {} is out of range 1..={}",
                chunk, total_chunks
            )));
        }
        Ok(Self { chunk, total_chunks })
    }

    /// The whole list in one run
    pub fn single() -> Self {
        Self {
            chunk: 1,
            total_chunks: 1,
        }
    }

    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Report file name for this chunk
    pub fn report_file_name(&self) -> String {
        format!("report_chunk_{}.json", self.chunk)
    }
}

impl fmt::Display for ChunkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chunk, self.total_chunks)
    }
}

/// A descriptor paired with the screenshot path it will be captured to
#[derive(Debug, Clone)]
pub struct CaptureJob<'a> {
    pub descriptor: &'a ChannelDescriptor,
    pub output_path: PathBuf,
}

impl<'a> CaptureJob<'a> {
    pub fn new(descriptor: &'a ChannelDescriptor, screenshots_dir: &Path) -> Self {
        let file_name = format!(
            "{} - {}.jpg",
            safe_filename(&descriptor.channel_name),
            descriptor.stream_id
        );
        Self {
            descriptor,
            output_path: screenshots_dir.join(file_name),
        }
    }
}

/// Outcome for a single channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub channel: String,
    pub stream_id: String,
    pub logo_downloaded: bool,
    pub capture_success: bool,
    pub quality_score: f64,
}

impl CaptureResult {
    /// Successful capture with a measured score
    pub fn captured(descriptor: &ChannelDescriptor, logo_downloaded: bool, quality_score: f64) -> Self {
        Self {
            channel: descriptor.channel_name.clone(),
            stream_id: descriptor.stream_id.clone(),
            logo_downloaded,
            capture_success: true,
            quality_score,
        }
    }

    /// Failed capture; the score is always zero
    pub fn failed(descriptor: &ChannelDescriptor, logo_downloaded: bool) -> Self {
        Self {
            channel: descriptor.channel_name.clone(),
            stream_id: descriptor.stream_id.clone(),
            logo_downloaded,
            capture_success: false,
            quality_score: 0.0,
        }
    }
}

/// Per-chunk report written once at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: String,
    pub chunk: String,
    pub total_channels: usize,
    pub successful_captures: usize,
    pub average_quality: f64,
    pub details: Vec<CaptureResult>,
}

impl Report {
    /// Assemble the report from ordered results
    pub fn assemble(chunk: ChunkSpec, timestamp: String, details: Vec<CaptureResult>) -> Self {
        let successful_captures = details.iter().filter(|r| r.capture_success).count();
        let quality_sum: f64 = details
            .iter()
            .filter(|r| r.capture_success)
            .map(|r| r.quality_score)
            .sum();
        let average_quality = quality_sum / successful_captures.max(1) as f64;

        Self {
            timestamp,
            chunk: chunk.to_string(),
            total_channels: details.len(),
            successful_captures,
            average_quality,
            details,
        }
    }

    /// Percentage of channels captured successfully; `None` for an empty chunk
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_channels == 0 {
            None
        } else {
            Some(self.successful_captures as f64 / self.total_channels as f64 * 100.0)
        }
    }
}

/// Luminance statistics of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaStats {
    /// Variance of the Laplacian response
    pub laplacian_variance: f64,
    /// Mean luminance on a 0-255 scale
    pub mean: f64,
}

/// Classification of a captured frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityVerdict {
    /// Near-black, near-flat frame
    BlackScreen,
    /// The frame could not be decoded or measured
    Unscored,
    /// Laplacian variance of a usable frame
    Measured(f64),
}

impl QualityVerdict {
    /// Score reported for a black screen
    pub const BLACK_SCREEN_SCORE: f64 = -1.0;
    /// Score reported when nothing could be measured
    pub const UNSCORED: f64 = 0.0;

    /// Numeric score carried in reports
    pub fn score(&self) -> f64 {
        match self {
            QualityVerdict::BlackScreen => Self::BLACK_SCREEN_SCORE,
            QualityVerdict::Unscored => Self::UNSCORED,
            QualityVerdict::Measured(variance) => *variance,
        }
    }
}

/// Every tunable of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub playlist_path: PathBuf,
    pub logos_dir: PathBuf,
    pub screenshots_dir: PathBuf,
    pub report_dir: PathBuf,
    pub ffmpeg_path: String,
    pub capture_timeout: Duration,
    pub settle_delay: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub logo_timeout: Duration,
    pub success_threshold: f64,
    pub engine_health_url: Option<String>,
    pub engine_health_timeout: Duration,
    pub engine_poll_interval: Duration,
    /// Per-request limit of a single health check
    pub engine_request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            playlist_path: PathBuf::from("aux/kanalak_jatorrizko.m3u"),
            logos_dir: PathBuf::from("logos_canales"),
            screenshots_dir: PathBuf::from("canales_screenshots"),
            report_dir: PathBuf::from("."),
            ffmpeg_path: "ffmpeg".to_string(),
            capture_timeout: Duration::from_secs(25),
            settle_delay: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(10),
            logo_timeout: Duration::from_secs(10),
            success_threshold: 50.0,
            engine_health_url: None,
            engine_health_timeout: Duration::from_secs(30),
            engine_poll_interval: Duration::from_secs(5),
            engine_request_timeout: Duration::from_secs(5),
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_retries == 0 {
            return Err(DomainError::BadArgs(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.capture_timeout.is_zero() {
            return Err(DomainError::BadArgs(
                "capture_timeout must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.success_threshold) {
            return Err(DomainError::BadArgs(format!(
                "success_threshold must be within 0..=100, got {}",
                self.success_threshold
            )));
        }
        if self.engine_health_url.is_some() && self.engine_poll_interval.is_zero() {
            return Err(DomainError::BadArgs(
                "engine_poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.engine_health_url.is_some() && self.engine_request_timeout.is_zero() {
            return Err(DomainError::BadArgs(
                "engine_request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

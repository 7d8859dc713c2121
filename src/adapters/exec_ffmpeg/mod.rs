//! FFmpeg frame-grab adapter
//!
//! Runs the `ffmpeg` binary to pull exactly one frame out of a live stream.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based frame grabber
pub struct FFmpegAdapter {
    ffmpeg_path: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter using the given binary
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, DomainError> {
        let ffmpeg_path = ffmpeg_path.into();
        if ffmpeg_path.trim().is_empty() {
            return Err(DomainError::BadArgs("ffmpeg path is empty".to_string()));
        }
        Ok(Self { ffmpeg_path })
    }

    /// Arguments for a single-frame grab
    pub fn build_args(stream_url: &str, output_path: &Path, settle_delay: Duration) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format_seconds(settle_delay),
            "-i".to_string(),
            stream_url.to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "image2".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            output_path.to_string_lossy().to_string(),
        ]
    }
}

fn format_seconds(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        duration.as_secs().to_string()
    } else {
        format!("{:.3}", duration.as_secs_f64())
    }
}

#[async_trait]
impl FrameGrabPort for FFmpegAdapter {
    async fn grab_frame(
        &self,
        stream_url: &str,
        output_path: &Path,
        settle_delay: Duration,
    ) -> Result<(), DomainError> {
        let args = Self::build_args(stream_url, output_path, settle_delay);
        debug!("Running {} {}", self.ffmpeg_path, args.join(" "));

        // The caller's timeout drops this future; the child must die with it.
        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProcessFailed(format!("Failed to run {}: {}", self.ffmpeg_path, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProcessFailed(format!(
                "ffmpeg exited with {}: {}",
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

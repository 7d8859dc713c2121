// Ports - Capabilities the pipeline depends on

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for grabbing a single still frame from a live stream
#[async_trait]
pub trait FrameGrabPort: Send + Sync {
    /// Write one frame of `stream_url`, taken after `settle_delay`, to `output_path`
    ///
    /// Callers bound the call with their own deadline; dropping the future must
    /// abandon the grab.
    async fn grab_frame(
        &self,
        stream_url: &str,
        output_path: &Path,
        settle_delay: Duration,
    ) -> Result<(), DomainError>;
}

/// Port for checking that a file decodes as an image
#[async_trait]
pub trait ImageCheckPort: Send + Sync {
    /// Returns the decoded dimensions
    async fn verify_image(&self, image_path: &Path) -> Result<(u32, u32), DomainError>;
}

/// Port for measuring luminance statistics of an image
#[async_trait]
pub trait LumaMetricsPort: Send + Sync {
    async fn measure(&self, image_path: &Path) -> Result<LumaStats, DomainError>;
}

/// Port for downloading channel logos
#[async_trait]
pub trait LogoFetchPort: Send + Sync {
    /// Stored logo path, or `None` when the logo could not be fetched
    async fn fetch_logo(&self, logo_url: &str, channel_id: &str) -> Option<PathBuf>;
}

/// Port for reading channel descriptors from a playlist source
#[async_trait]
pub trait PlaylistPort: Send + Sync {
    async fn load_channels(&self, playlist_path: &Path) -> Result<Vec<ChannelDescriptor>, DomainError>;
}

/// Port for checking that the streaming engine answers
#[async_trait]
pub trait EngineHealthPort: Send + Sync {
    /// Single readiness check
    async fn is_ready(&self) -> bool;
}

/// Port for the output directories and report file
#[async_trait]
pub trait FsPort: Send + Sync {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Size in bytes
    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError>;

    /// `mkdir -p`
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Remove every file in the directory, creating it when missing
    async fn clean_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Missing files are not an error
    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Temp file in the same directory, then rename over `file_path`
    async fn write_atomic(&self, file_path: &Path, contents: &[u8]) -> Result<(), DomainError>;
}

/// Port the interactors report progress through
#[async_trait]
pub trait LogPort: Send + Sync {
    async fn info(&self, message: &str);
    async fn warn(&self, message: &str);
    async fn error(&self, message: &str);

    /// Message plus key/value context (`stream_id`, `attempt`, ...)
    async fn log_event(&self, event: &LogEvent);
}

/// One structured progress event
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    /// Attach a context field
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_filter().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "unknown log level '{}' (expected trace, debug, info, warn or error)",
                    s
                ))
            })
    }
}

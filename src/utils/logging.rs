//! Logging configuration and subscriber setup

use tracing_subscriber::EnvFilter;

use crate::ports::LogLevel;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Include target module information
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            target: false,
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Env filter: `RUST_LOG` wins over the configured level
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_filter()))
    }

    /// Install the global subscriber; a second call is a no-op
    pub fn initialize(&self) {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.config.target)
            .with_writer(std::io::stderr);

        let result = match self.config.format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };

        if let Err(e) = result {
            // Already installed (tests, embedding); keep the existing one.
            tracing::debug!("Logging already initialized: {}", e);
        }

        tracing::debug!(
            "Logging system initialized with level: {:?}, format: {:?}",
            self.config.level,
            self.config.format
        );
    }

    /// Log build information
    pub fn log_system_info(&self) {
        tracing::info!("acecap {}", env!("CARGO_PKG_VERSION"));
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

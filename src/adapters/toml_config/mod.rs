// TOML config adapter - Pipeline settings from a TOML file

use crate::domain::errors::*;
use crate::domain::model::PipelineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings accepted in the `[pipeline]` table; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    pub playlist_path: Option<PathBuf>,
    pub logos_dir: Option<PathBuf>,
    pub screenshots_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub ffmpeg_path: Option<String>,
    pub capture_timeout_secs: Option<f64>,
    pub settle_delay_secs: Option<f64>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<f64>,
    pub logo_timeout_secs: Option<f64>,
    pub success_threshold: Option<f64>,
    pub engine_health_url: Option<String>,
    pub engine_health_timeout_secs: Option<f64>,
    pub engine_poll_interval_secs: Option<f64>,
    pub engine_request_timeout_secs: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    pipeline: PipelineSection,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[pipeline]` table from TOML text
    pub fn parse(toml_content: &str) -> Result<PipelineSection, DomainError> {
        let document: ConfigDocument = toml::from_str(toml_content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))?;
        Ok(document.pipeline)
    }

    /// Load the `[pipeline]` table from a file
    pub fn load(file_path: &Path) -> Result<PipelineSection, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::FileNotFound(format!(
                "Config file does not exist: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read_to_string(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;

        Self::parse(&content)
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration, DomainError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| DomainError::BadArgs(format!("Invalid duration for {}: {}", key, value)))
}

impl PipelineSection {
    /// Overlay the values present in this section onto `config`
    pub fn apply_to(&self, config: &mut PipelineConfig) -> Result<(), DomainError> {
        if let Some(path) = &self.playlist_path {
            config.playlist_path = path.clone();
        }
        if let Some(dir) = &self.logos_dir {
            config.logos_dir = dir.clone();
        }
        if let Some(dir) = &self.screenshots_dir {
            config.screenshots_dir = dir.clone();
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(path) = &self.ffmpeg_path {
            config.ffmpeg_path = path.clone();
        }
        if let Some(secs) = self.capture_timeout_secs {
            config.capture_timeout = seconds("capture_timeout_secs", secs)?;
        }
        if let Some(secs) = self.settle_delay_secs {
            config.settle_delay = seconds("settle_delay_secs", secs)?;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(secs) = self.retry_delay_secs {
            config.retry_delay = seconds("retry_delay_secs", secs)?;
        }
        if let Some(secs) = self.logo_timeout_secs {
            config.logo_timeout = seconds("logo_timeout_secs", secs)?;
        }
        if let Some(threshold) = self.success_threshold {
            config.success_threshold = threshold;
        }
        if let Some(url) = &self.engine_health_url {
            config.engine_health_url = Some(url.clone());
        }
        if let Some(secs) = self.engine_health_timeout_secs {
            config.engine_health_timeout = seconds("engine_health_timeout_secs", secs)?;
        }
        if let Some(secs) = self.engine_poll_interval_secs {
            config.engine_poll_interval = seconds("engine_poll_interval_secs", secs)?;
        }
        if let Some(secs) = self.engine_request_timeout_secs {
            config.engine_request_timeout = seconds("engine_request_timeout_secs", secs)?;
        }
        Ok(())
    }
}

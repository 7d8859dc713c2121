// Pipeline interactor - Processes one chunk and aggregates the report

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::capture_interactor::CaptureInteractor;
use crate::app::quality_interactor::QualityInteractor;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Longest channel-name prefix shown in progress lines
const PROGRESS_NAME_CHARS: usize = 50;

/// Result of a finished chunk run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    pub gate: GateOutcome,
    /// Black-screen frames whose deletion failed
    pub retained_artifacts: Vec<PathBuf>,
}

/// One channel's result
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutcome {
    pub result: CaptureResult,
    /// Set when a black-screen frame is still on disk
    pub retained_artifact: Option<PathBuf>,
}

impl From<CaptureResult> for ChannelOutcome {
    fn from(result: CaptureResult) -> Self {
        Self {
            result,
            retained_artifact: None,
        }
    }
}

impl RunOutcome {
    /// Success rate in percent; an empty chunk counts as zero
    pub fn success_rate(&self) -> f64 {
        self.report.success_rate().unwrap_or(0.0)
    }
}

/// Interactor for the chunk pipeline use case
pub struct PipelineInteractor {
    capture: Arc<CaptureInteractor>,
    quality: Arc<QualityInteractor>,
    logo_fetch_port: Arc<dyn LogoFetchPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    config: PipelineConfig,
}

impl PipelineInteractor {
    /// Create new pipeline interactor with injected collaborators
    pub fn new(
        capture: Arc<CaptureInteractor>,
        quality: Arc<QualityInteractor>,
        logo_fetch_port: Arc<dyn LogoFetchPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            capture,
            quality,
            logo_fetch_port,
            fs_port,
            log_port,
            config,
        }
    }

    /// Create the logo directory and empty the screenshot directory
    pub async fn prepare(&self) -> Result<(), DomainError> {
        self.fs_port.create_directory(&self.config.logos_dir).await?;
        self.fs_port
            .clean_directory(&self.config.screenshots_dir)
            .await?;
        Ok(())
    }

    /// Full run: prepare, process the chunk, write the report, apply the gate
    pub async fn run(
        &self,
        channels: &[ChannelDescriptor],
        chunk: ChunkSpec,
    ) -> Result<RunOutcome, DomainError> {
        self.prepare().await?;

        let mut details = Vec::new();
        let mut retained_artifacts = Vec::new();
        for outcome in self.process_chunk(channels, chunk).await {
            details.push(outcome.result);
            retained_artifacts.extend(outcome.retained_artifact);
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let report = Report::assemble(chunk, timestamp, details);
        let report_path = self.write_report(&report, chunk).await?;
        let gate = QualityGate::new(self.config.success_threshold).evaluate(&report);

        Ok(RunOutcome {
            report,
            report_path,
            gate,
            retained_artifacts,
        })
    }

    /// Process the descriptors owned by `chunk`, strictly in order
    pub async fn process_chunk(
        &self,
        channels: &[ChannelDescriptor],
        chunk: ChunkSpec,
    ) -> Vec<ChannelOutcome> {
        let selected = ChunkPartitioner::select(channels, chunk);
        self.log_port
            .info(&format!(
                "Processing chunk {} ({} channels)",
                chunk,
                selected.len()
            ))
            .await;

        let mut results = Vec::with_capacity(selected.len());
        for (index, descriptor) in selected.iter().enumerate() {
            results.push(
                self.process_channel(descriptor, index + 1, selected.len())
                    .await,
            );
        }
        results
    }

    /// Logo, capture, quality and black-screen post-check for one channel
    pub async fn process_channel(
        &self,
        descriptor: &ChannelDescriptor,
        position: usize,
        total: usize,
    ) -> ChannelOutcome {
        let short_name: String = descriptor
            .channel_name
            .chars()
            .take(PROGRESS_NAME_CHARS)
            .collect();
        self.log_port
            .log_event(
                &LogEvent::new(
                    LogLevel::Info,
                    format!("[{}/{}] Processing: {}", position, total, short_name),
                )
                .with("channel", &descriptor.channel_name)
                .with("stream_id", &descriptor.stream_id),
            )
            .await;

        let logo_downloaded = self
            .logo_fetch_port
            .fetch_logo(&descriptor.logo_url, &descriptor.channel_id)
            .await
            .is_some();

        let job = CaptureJob::new(descriptor, &self.config.screenshots_dir);
        let captured = self
            .capture
            .capture(
                &job.descriptor.stream_url,
                &job.output_path,
                self.config.capture_timeout,
            )
            .await;

        if !captured {
            self.log_port
                .log_event(
                    &LogEvent::new(LogLevel::Warn, "Capture failed")
                        .with("stream_id", &descriptor.stream_id),
                )
                .await;
            return CaptureResult::failed(descriptor, logo_downloaded).into();
        }

        match self.quality.verdict(&job.output_path).await {
            QualityVerdict::BlackScreen => {
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Warn, "Black screen detected, removing capture")
                            .with("stream_id", &descriptor.stream_id),
                    )
                    .await;
                let retained_artifact = match self.fs_port.delete_file(&job.output_path).await {
                    Ok(()) => None,
                    Err(e) => {
                        self.log_port
                            .log_event(
                                &LogEvent::new(
                                    LogLevel::Error,
                                    format!("Could not remove black-screen capture: {}", e),
                                )
                                .with("stream_id", &descriptor.stream_id)
                                .with("path", job.output_path.display()),
                            )
                            .await;
                        Some(job.output_path.clone())
                    }
                };
                ChannelOutcome {
                    result: CaptureResult::failed(descriptor, logo_downloaded),
                    retained_artifact,
                }
            }
            verdict => {
                let score = verdict.score();
                self.log_port
                    .info(&format!("Capture succeeded (quality: {:.2})", score))
                    .await;
                CaptureResult::captured(descriptor, logo_downloaded, score).into()
            }
        }
    }

    /// Write `report_chunk_<n>.json` into the report directory
    pub async fn write_report(&self, report: &Report, chunk: ChunkSpec) -> Result<PathBuf, DomainError> {
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| DomainError::ProcessingError(format!("Failed to serialize report: {}", e)))?;
        let path = self.config.report_dir.join(chunk.report_file_name());
        self.fs_port.write_atomic(&path, &json).await?;
        Ok(path)
    }
}

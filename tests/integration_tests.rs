use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use acecap_cli::adapters::{FsLocalAdapter, ImageLumaAdapter, TracingLogAdapter};
use acecap_cli::app::{CaptureInteractor, CaptureSettings, PipelineInteractor, QualityInteractor};
use acecap_cli::domain::rules::GateOutcome;
use acecap_cli::ports::{FrameGrabPort, FsPort, LogoFetchPort};
use acecap_cli::*;
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use tempfile::TempDir;

/// Deterministic stand-ins for the external capabilities
mod test_utils {
    use super::*;

    /// Frame grab driven by a marker in the stream URL
    pub struct StubFrameGrab;

    #[async_trait]
    impl FrameGrabPort for StubFrameGrab {
        async fn grab_frame(
            &self,
            stream_url: &str,
            output_path: &Path,
            _settle_delay: Duration,
        ) -> Result<(), DomainError> {
            if stream_url.contains("black") {
                write_png(output_path, RgbImage::new(64, 48));
                Ok(())
            } else if stream_url.contains("sharp") {
                let stripes = RgbImage::from_fn(64, 48, |x, _| {
                    if x % 2 == 0 {
                        Rgb([255, 255, 255])
                    } else {
                        Rgb([0, 0, 0])
                    }
                });
                write_png(output_path, stripes);
                Ok(())
            } else if stream_url.contains("hang") {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            } else {
                Err(DomainError::ProcessFailed("stream unavailable".to_string()))
            }
        }
    }

    fn write_png(path: &Path, image: RgbImage) {
        image
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    /// Logo fetch that succeeds for every `ok` URL
    pub struct StubLogoFetch;

    #[async_trait]
    impl LogoFetchPort for StubLogoFetch {
        async fn fetch_logo(&self, logo_url: &str, channel_id: &str) -> Option<PathBuf> {
            logo_url
                .contains("ok")
                .then(|| PathBuf::from(format!("{}.png", channel_id)))
        }
    }

    pub fn channel(n: usize, kind: &str) -> ChannelDescriptor {
        ChannelDescriptor::new(
            format!("http://logos.test/ok/{}.png", n),
            format!("ch{}", n),
            format!("Channel {}: {}", n, kind),
            format!("http://127.0.0.1:6878/ace/getstream?id={}{}", kind, n),
        )
    }

    pub fn config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            logos_dir: root.join("logos"),
            screenshots_dir: root.join("shots"),
            report_dir: root.join("reports"),
            capture_timeout: Duration::from_millis(200),
            settle_delay: Duration::ZERO,
            max_retries: 2,
            retry_delay: Duration::ZERO,
            ..PipelineConfig::default()
        }
    }

    /// Local filesystem that refuses to delete black-screen frames
    pub struct StickyBlackFs(pub FsLocalAdapter);

    #[async_trait]
    impl FsPort for StickyBlackFs {
        async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
            self.0.file_exists(file_path).await
        }

        async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
            self.0.get_file_size(file_path).await
        }

        async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
            self.0.create_directory(dir_path).await
        }

        async fn clean_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
            self.0.clean_directory(dir_path).await
        }

        async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
            if file_path.to_string_lossy().contains("black") {
                return Err(DomainError::FsFail("permission denied".to_string()));
            }
            self.0.delete_file(file_path).await
        }

        async fn write_atomic(&self, file_path: &Path, contents: &[u8]) -> Result<(), DomainError> {
            self.0.write_atomic(file_path, contents).await
        }
    }

    pub fn pipeline(config: PipelineConfig) -> PipelineInteractor {
        pipeline_with_fs(config, Arc::new(FsLocalAdapter::new().unwrap()))
    }

    pub fn pipeline_with_fs(config: PipelineConfig, fs: Arc<dyn FsPort>) -> PipelineInteractor {
        let luma = Arc::new(ImageLumaAdapter::new());
        let log = Arc::new(TracingLogAdapter::new());

        let capture = Arc::new(CaptureInteractor::new(
            Arc::new(StubFrameGrab),
            luma.clone(),
            fs.clone(),
            log.clone(),
            CaptureSettings {
                settle_delay: config.settle_delay,
                max_retries: config.max_retries,
                retry_delay: config.retry_delay,
            },
        ));
        let quality = Arc::new(QualityInteractor::new(luma, log.clone()));

        PipelineInteractor::new(capture, quality, Arc::new(StubLogoFetch), fs, log, config)
    }
}

use test_utils::*;

#[tokio::test]
async fn test_mixed_chunk_end_to_end() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    let channels = vec![
        channel(1, "sharp"),
        channel(2, "black"),
        channel(3, "dead"),
        channel(4, "sharp"),
    ];

    let outcome = pipeline(config.clone())
        .run(&channels, ChunkSpec::single())
        .await
        .unwrap();
    let report = &outcome.report;

    let ids: Vec<&str> = report.details.iter().map(|r| r.stream_id.as_str()).collect();
    assert_eq!(ids, ["sharp1", "black2", "dead3", "sharp4"]);
    assert_eq!(report.chunk, "1/1");
    assert_eq!(report.total_channels, 4);
    assert_eq!(report.successful_captures, 2);

    // Black screen: forced failure, artifact gone
    let black = &report.details[1];
    assert!(!black.capture_success);
    assert_eq!(black.quality_score, 0.0);
    assert!(!config.screenshots_dir.join("Channel 2_ black - black2.jpg").exists());

    // Sharp captures kept under their sanitised names
    assert!(report.details[0].quality_score > 0.0);
    assert!(config.screenshots_dir.join("Channel 1_ sharp - sharp1.jpg").exists());
    assert!(config.screenshots_dir.join("Channel 4_ sharp - sharp4.jpg").exists());

    for failed in report.details.iter().filter(|r| !r.capture_success) {
        assert_eq!(failed.quality_score, 0.0);
    }

    // 2 of 4 is exactly the default threshold
    assert_eq!(outcome.gate, GateOutcome::Passed { success_rate: 50.0 });

    assert_eq!(outcome.report_path, config.report_dir.join("report_chunk_1.json"));
    let written: Report =
        serde_json::from_slice(&std::fs::read(&outcome.report_path).unwrap()).unwrap();
    assert_eq!(&written, report);
}

#[tokio::test]
async fn test_hanging_stream_is_recorded_as_failure() {
    let root = TempDir::new().unwrap();
    let channels = vec![channel(1, "hang"), channel(2, "sharp")];

    let outcome = pipeline(config(root.path()))
        .run(&channels, ChunkSpec::single())
        .await
        .unwrap();

    assert!(!outcome.report.details[0].capture_success);
    assert!(outcome.report.details[1].capture_success);
}

#[tokio::test]
async fn test_gate_at_forty_and_sixty_percent() {
    let root = TempDir::new().unwrap();
    let pipeline = pipeline(config(root.path()));

    let forty = vec![
        channel(1, "sharp"),
        channel(2, "sharp"),
        channel(3, "dead"),
        channel(4, "dead"),
        channel(5, "dead"),
    ];
    let outcome = pipeline.run(&forty, ChunkSpec::single()).await.unwrap();
    assert!(!outcome.gate.is_pass());
    assert_eq!(outcome.success_rate(), 40.0);

    let sixty = vec![
        channel(1, "sharp"),
        channel(2, "sharp"),
        channel(3, "sharp"),
        channel(4, "dead"),
        channel(5, "black"),
    ];
    let outcome = pipeline.run(&sixty, ChunkSpec::single()).await.unwrap();
    assert!(outcome.gate.is_pass());
    assert_eq!(outcome.success_rate(), 60.0);
}

#[tokio::test]
async fn test_rerun_produces_identical_report_except_timestamp() {
    let root = TempDir::new().unwrap();
    let pipeline = pipeline(config(root.path()));
    let channels = vec![channel(1, "sharp"), channel(2, "black"), channel(3, "dead")];

    let mut first = pipeline.run(&channels, ChunkSpec::single()).await.unwrap().report;
    let mut second = pipeline.run(&channels, ChunkSpec::single()).await.unwrap().report;

    first.timestamp.clear();
    second.timestamp.clear();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_only_the_selected_chunk_is_processed() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    let channels: Vec<_> = (1..=10).map(|n| channel(n, "sharp")).collect();

    let chunk = ChunkSpec::new(3, 3).unwrap();
    let outcome = pipeline(config.clone()).run(&channels, chunk).await.unwrap();

    let ids: Vec<&str> = outcome
        .report
        .details
        .iter()
        .map(|r| r.stream_id.as_str())
        .collect();
    assert_eq!(ids, ["sharp9", "sharp10"]);
    assert_eq!(outcome.report.chunk, "3/3");
    assert_eq!(outcome.report_path, config.report_dir.join("report_chunk_3.json"));
}

#[tokio::test]
async fn test_empty_chunk_writes_report_and_passes() {
    let root = TempDir::new().unwrap();
    let channels = vec![channel(1, "sharp"), channel(2, "sharp")];

    let outcome = pipeline(config(root.path()))
        .run(&channels, ChunkSpec::new(3, 3).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.gate, GateOutcome::EmptyChunk);
    assert_eq!(outcome.report.total_channels, 0);
    assert_eq!(outcome.report.average_quality, 0.0);
    assert!(outcome.report_path.exists());
}

#[tokio::test]
async fn test_stale_screenshots_are_cleared_and_logos_dir_created() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    std::fs::create_dir_all(&config.screenshots_dir).unwrap();
    let stale = config.screenshots_dir.join("old - x.jpg");
    std::fs::write(&stale, b"stale").unwrap();

    pipeline(config.clone()).run(&[], ChunkSpec::single()).await.unwrap();

    assert!(!stale.exists());
    assert!(config.logos_dir.is_dir());
}

#[tokio::test]
async fn test_logo_outcome_is_recorded_independently() {
    let root = TempDir::new().unwrap();
    let mut no_logo = channel(2, "sharp");
    no_logo.logo_url = "http://logos.test/missing.png".to_string();
    let channels = vec![channel(1, "dead"), no_logo];

    let outcome = pipeline(config(root.path()))
        .run(&channels, ChunkSpec::single())
        .await
        .unwrap();

    let details = &outcome.report.details;
    assert!(details[0].logo_downloaded && !details[0].capture_success);
    assert!(!details[1].logo_downloaded && details[1].capture_success);
}

#[tokio::test]
async fn test_undeletable_black_screen_is_reported_as_retained() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    let fs = Arc::new(StickyBlackFs(FsLocalAdapter::new().unwrap()));
    let channels = vec![channel(1, "sharp"), channel(2, "black")];

    let outcome = pipeline_with_fs(config.clone(), fs)
        .run(&channels, ChunkSpec::single())
        .await
        .unwrap();

    let black = &outcome.report.details[1];
    assert!(!black.capture_success);
    assert_eq!(black.quality_score, 0.0);

    let leftover = config.screenshots_dir.join("Channel 2_ black - black2.jpg");
    assert_eq!(outcome.retained_artifacts, vec![leftover.clone()]);
    assert!(leftover.exists());
}

#[tokio::test]
async fn test_deleted_black_screen_leaves_nothing_retained() {
    let root = TempDir::new().unwrap();
    let channels = vec![channel(1, "black")];

    let outcome = pipeline(config(root.path()))
        .run(&channels, ChunkSpec::single())
        .await
        .unwrap();

    assert!(outcome.retained_artifacts.is_empty());
}

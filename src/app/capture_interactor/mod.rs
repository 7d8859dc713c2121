// Capture interactor - One verification frame per stream, with bounded retries

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::domain::errors::*;
use crate::domain::model::ChannelDescriptor;
use crate::ports::*;

/// Retry and settle parameters of the capture engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Delay before the frame is taken, letting the stream buffer
    pub settle_delay: Duration,
    /// Attempts per stream, at least one
    pub max_retries: u32,
    /// Base of the linear backoff: attempt `n` is followed by `n * retry_delay`
    pub retry_delay: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// Interactor for the capture use case
pub struct CaptureInteractor {
    frame_grab_port: Arc<dyn FrameGrabPort>,
    image_check_port: Arc<dyn ImageCheckPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    settings: CaptureSettings,
}

impl CaptureInteractor {
    /// Create new capture interactor with injected ports
    pub fn new(
        frame_grab_port: Arc<dyn FrameGrabPort>,
        image_check_port: Arc<dyn ImageCheckPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            frame_grab_port,
            image_check_port,
            fs_port,
            log_port,
            settings: CaptureSettings {
                max_retries: settings.max_retries.max(1),
                ..settings
            },
        }
    }

    /// Capture one frame of `stream_url` into `output_path`
    ///
    /// Returns `false` once every attempt has failed; `output_path` is then
    /// absent. Never errors: a dead channel is an expected outcome.
    pub async fn capture(&self, stream_url: &str, output_path: &Path, deadline: Duration) -> bool {
        let max_retries = self.settings.max_retries;
        let stream_id = ChannelDescriptor::extract_stream_id(stream_url);

        for attempt in 1..=max_retries {
            match self.attempt(stream_url, output_path, deadline).await {
                Ok(()) => {
                    self.log_port
                        .log_event(
                            &LogEvent::new(LogLevel::Debug, "Frame captured")
                                .with("stream_id", &stream_id)
                                .with("path", output_path.display())
                                .with("attempt", attempt),
                        )
                        .await;
                    return true;
                }
                Err(e) => {
                    let message = match e {
                        DomainError::Timeout(_) => {
                            format!("Timeout (attempt {}/{})", attempt, max_retries)
                        }
                        other => format!("Attempt {}/{} failed: {}", attempt, max_retries, other),
                    };
                    self.log_port
                        .log_event(
                            &LogEvent::new(LogLevel::Warn, message)
                                .with("stream_id", &stream_id)
                                .with("attempt", attempt),
                        )
                        .await;
                    self.discard(output_path).await;
                }
            }

            if attempt < max_retries {
                sleep(self.settings.retry_delay * attempt).await;
            }
        }

        false
    }

    /// One bounded frame grab followed by structural checks of the output
    async fn attempt(
        &self,
        stream_url: &str,
        output_path: &Path,
        deadline: Duration,
    ) -> Result<(), DomainError> {
        let grab = self
            .frame_grab_port
            .grab_frame(stream_url, output_path, self.settings.settle_delay);
        timeout(deadline, grab).await.map_err(|_| {
            DomainError::Timeout(format!("frame grab exceeded {:.1}s", deadline.as_secs_f64()))
        })??;

        if !self.fs_port.file_exists(output_path).await? {
            return Err(DomainError::FileNotFound(format!(
                "capture produced no file at {}",
                output_path.display()
            )));
        }
        if self.fs_port.get_file_size(output_path).await? == 0 {
            return Err(DomainError::InvalidFormat("empty capture".to_string()));
        }
        self.image_check_port.verify_image(output_path).await?;

        Ok(())
    }

    async fn discard(&self, output_path: &Path) {
        if let Err(e) = self.fs_port.delete_file(output_path).await {
            self.log_port
                .error(&format!("Could not remove failed capture: {}", e))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FsLocalAdapter, ImageLumaAdapter, TracingLogAdapter};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;
    use tempfile::TempDir;

    /// What the stub writes on each call
    #[derive(Clone, Copy)]
    enum Grab {
        Hang,
        Fail,
        Nothing,
        Empty,
        Garbage,
        Png,
    }

    struct ScriptedGrab {
        script: Mutex<Vec<Grab>>,
        calls: AtomicU32,
    }

    impl ScriptedGrab {
        fn new(script: Vec<Grab>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FrameGrabPort for ScriptedGrab {
        async fn grab_frame(
            &self,
            _stream_url: &str,
            output_path: &Path,
            _settle_delay: Duration,
        ) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.remove(0)
                } else {
                    script[0]
                }
            };
            match step {
                Grab::Hang => {
                    sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
                Grab::Fail => Err(DomainError::ProcessFailed("exit 1".to_string())),
                Grab::Nothing => Ok(()),
                Grab::Empty => {
                    std::fs::write(output_path, b"").unwrap();
                    Ok(())
                }
                Grab::Garbage => {
                    std::fs::write(output_path, b"not an image").unwrap();
                    Ok(())
                }
                Grab::Png => {
                    image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]))
                        .save_with_format(output_path, image::ImageFormat::Png)
                        .unwrap();
                    Ok(())
                }
            }
        }
    }

    /// Keeps every event for later inspection
    #[derive(Default)]
    struct RecordingLog {
        events: Mutex<Vec<LogEvent>>,
    }

    #[async_trait]
    impl LogPort for RecordingLog {
        async fn info(&self, message: &str) {
            self.log_event(&LogEvent::new(LogLevel::Info, message)).await;
        }

        async fn warn(&self, message: &str) {
            self.log_event(&LogEvent::new(LogLevel::Warn, message)).await;
        }

        async fn error(&self, message: &str) {
            self.log_event(&LogEvent::new(LogLevel::Error, message)).await;
        }

        async fn log_event(&self, event: &LogEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn interactor(grab: Arc<ScriptedGrab>, max_retries: u32, retry_delay: Duration) -> CaptureInteractor {
        interactor_with_log(grab, max_retries, retry_delay, Arc::new(TracingLogAdapter::new()))
    }

    fn interactor_with_log(
        grab: Arc<ScriptedGrab>,
        max_retries: u32,
        retry_delay: Duration,
        log: Arc<dyn LogPort>,
    ) -> CaptureInteractor {
        CaptureInteractor::new(
            grab,
            Arc::new(ImageLumaAdapter::new()),
            Arc::new(FsLocalAdapter::new().unwrap()),
            log,
            CaptureSettings {
                settle_delay: Duration::ZERO,
                max_retries,
                retry_delay,
            },
        )
    }

    #[tokio::test]
    async fn test_always_timing_out_is_attempted_max_retries_times() {
        let dir = TempDir::new().unwrap();
        let grab = ScriptedGrab::new(vec![Grab::Hang]);
        let engine = interactor(grab.clone(), 3, Duration::ZERO);

        let out = dir.path().join("frame.jpg");
        let ok = engine.capture("http://x", &out, Duration::from_millis(20)).await;

        assert!(!ok);
        assert_eq!(grab.calls(), 3);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let dir = TempDir::new().unwrap();
        let grab = ScriptedGrab::new(vec![Grab::Png]);
        let engine = interactor(grab.clone(), 3, Duration::ZERO);

        let out = dir.path().join("frame.jpg");
        assert!(engine.capture("http://x", &out, Duration::from_secs(5)).await);
        assert_eq!(grab.calls(), 1);
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let dir = TempDir::new().unwrap();
        let grab = ScriptedGrab::new(vec![Grab::Fail, Grab::Garbage, Grab::Png]);
        let engine = interactor(grab.clone(), 3, Duration::ZERO);

        let out = dir.path().join("frame.jpg");
        assert!(engine.capture("http://x", &out, Duration::from_secs(5)).await);
        assert_eq!(grab.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_outputs_never_survive() {
        for step in [Grab::Nothing, Grab::Empty, Grab::Garbage, Grab::Fail] {
            let dir = TempDir::new().unwrap();
            let grab = ScriptedGrab::new(vec![step]);
            let engine = interactor(grab.clone(), 2, Duration::ZERO);

            let out = dir.path().join("frame.jpg");
            assert!(!engine.capture("http://x", &out, Duration::from_secs(5)).await);
            assert_eq!(grab.calls(), 2);
            assert!(!out.exists());
        }
    }

    #[tokio::test]
    async fn test_linear_backoff_between_attempts() {
        let dir = TempDir::new().unwrap();
        let grab = ScriptedGrab::new(vec![Grab::Fail]);
        let engine = interactor(grab.clone(), 3, Duration::from_millis(40));

        let started = Instant::now();
        let out = dir.path().join("frame.jpg");
        assert!(!engine.capture("http://x", &out, Duration::from_secs(5)).await);

        // 40ms after attempt 1 plus 80ms after attempt 2, nothing after the last
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(120), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(2), "elapsed {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_zero_retries_still_attempts_once() {
        let dir = TempDir::new().unwrap();
        let grab = ScriptedGrab::new(vec![Grab::Fail]);
        let engine = interactor(grab.clone(), 0, Duration::ZERO);

        let out = dir.path().join("frame.jpg");
        assert!(!engine.capture("http://x", &out, Duration::from_secs(5)).await);
        assert_eq!(grab.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_warnings_carry_stream_id_and_attempt() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(RecordingLog::default());
        let engine = interactor_with_log(ScriptedGrab::new(vec![Grab::Fail]), 2, Duration::ZERO, log.clone());

        let out = dir.path().join("frame.jpg");
        let url = "http://127.0.0.1:6878/ace/getstream?id=abc123";
        assert!(!engine.capture(url, &out, Duration::from_secs(5)).await);

        let events = log.events.lock().unwrap();
        let warnings: Vec<_> = events.iter().filter(|e| e.level == LogLevel::Warn).collect();
        assert_eq!(warnings.len(), 2);
        for (n, event) in warnings.iter().enumerate() {
            assert_eq!(event.context["stream_id"], "abc123");
            assert_eq!(event.context["attempt"], (n + 1).to_string());
        }
    }
}

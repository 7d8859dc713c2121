use std::sync::Arc;

use crate::adapters::{
    FFmpegAdapter, FsLocalAdapter, HttpEngineHealthAdapter, HttpLogoAdapter, ImageLumaAdapter,
    M3uPlaylistAdapter, TracingLogAdapter,
};
use crate::app::{
    capture_interactor::{CaptureInteractor, CaptureSettings},
    engine_interactor::EngineInteractor,
    pipeline_interactor::PipelineInteractor,
    quality_interactor::QualityInteractor,
};
use crate::domain::errors::DomainError;
use crate::domain::model::PipelineConfig;
use crate::ports::{
    EngineHealthPort, FrameGrabPort, FsPort, ImageCheckPort, LogPort, LogoFetchPort,
    LumaMetricsPort, PlaylistPort,
};

pub trait AppContainer: Send + Sync {
    fn playlist_port(&self) -> Arc<dyn PlaylistPort>;
    fn pipeline_interactor(&self) -> Arc<PipelineInteractor>;
    /// `None` when no engine health URL is configured
    fn engine_interactor(&self) -> Option<Arc<EngineInteractor>>;
}

pub struct DefaultAppContainer {
    playlist_port: Arc<dyn PlaylistPort>,
    pipeline_interactor: Arc<PipelineInteractor>,
    engine_interactor: Option<Arc<EngineInteractor>>,
}

impl DefaultAppContainer {
    pub fn new(config: &PipelineConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let frame_grab_port = Arc::new(FFmpegAdapter::new(config.ffmpeg_path.clone())?);
        let luma_port = Arc::new(ImageLumaAdapter::new());
        let fs_port = Arc::new(FsLocalAdapter::new()?);
        let log_port = Arc::new(TracingLogAdapter::new());
        let logo_port = Arc::new(HttpLogoAdapter::new(
            config.logos_dir.clone(),
            config.logo_timeout,
            config.max_retries,
            config.retry_delay,
        )?);

        let capture_interactor = Arc::new(CaptureInteractor::new(
            Arc::clone(&frame_grab_port) as Arc<dyn FrameGrabPort>,
            Arc::clone(&luma_port) as Arc<dyn ImageCheckPort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
            CaptureSettings {
                settle_delay: config.settle_delay,
                max_retries: config.max_retries,
                retry_delay: config.retry_delay,
            },
        ));

        let quality_interactor = Arc::new(QualityInteractor::new(
            Arc::clone(&luma_port) as Arc<dyn LumaMetricsPort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
        ));

        let pipeline_interactor = Arc::new(PipelineInteractor::new(
            capture_interactor,
            quality_interactor,
            Arc::clone(&logo_port) as Arc<dyn LogoFetchPort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
            config.clone(),
        ));

        let engine_interactor = match &config.engine_health_url {
            Some(url) => {
                let health_port = Arc::new(HttpEngineHealthAdapter::new(
                    url.clone(),
                    config.engine_request_timeout,
                )?);
                Some(Arc::new(EngineInteractor::new(
                    health_port as Arc<dyn EngineHealthPort>,
                    Arc::clone(&log_port) as Arc<dyn LogPort>,
                )))
            }
            None => None,
        };

        Ok(Self {
            playlist_port: Arc::new(M3uPlaylistAdapter::new()),
            pipeline_interactor,
            engine_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn playlist_port(&self) -> Arc<dyn PlaylistPort> {
        Arc::clone(&self.playlist_port)
    }

    fn pipeline_interactor(&self) -> Arc<PipelineInteractor> {
        Arc::clone(&self.pipeline_interactor)
    }

    fn engine_interactor(&self) -> Option<Arc<EngineInteractor>> {
        self.engine_interactor.clone()
    }
}

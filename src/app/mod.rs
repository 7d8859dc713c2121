// Application layer - Use case interactors

pub mod capture_interactor;
pub mod container;
pub mod engine_interactor;
pub mod pipeline_interactor;
pub mod quality_interactor;

// Re-export interactors
pub use capture_interactor::{CaptureInteractor, CaptureSettings};
pub use engine_interactor::EngineInteractor;
pub use pipeline_interactor::{ChannelOutcome, PipelineInteractor, RunOutcome};
pub use quality_interactor::QualityInteractor;

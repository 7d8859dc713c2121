//! acecap library
//!
//! Stream capture and quality validation for IPTV/Acestream playlists: chunked
//! channel selection, bounded frame capture, Laplacian sharpness scoring with
//! black-screen detection, and a threshold-gated JSON report.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    CaptureResult, ChannelDescriptor, ChunkSpec, PipelineConfig, QualityVerdict, Report,
};
pub use error::{AcecapError, AcecapResult};

//! Error handling module for acecap

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for acecap operations
#[derive(Error, Debug)]
pub enum AcecapError {
    /// Invalid chunk selection, thresholds, timeouts or config file contents
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Playlist file not found or inaccessible
    #[error("Playlist not found: {path}")]
    PlaylistNotFound { path: String },

    /// Playlist parsed but yielded no channel descriptors
    #[error("Playlist has no channels: {path}")]
    EmptyPlaylist { path: String },

    /// Streaming engine never answered its health endpoint
    #[error("Streaming engine not ready at {url} after {waited_secs}s")]
    EngineNotReady { url: String, waited_secs: u64 },

    /// Domain-level failure
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type alias for acecap operations
pub type AcecapResult<T> = std::result::Result<T, AcecapError>;

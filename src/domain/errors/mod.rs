// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments or configuration provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// Invalid file format (undecodable image, malformed playlist)
    InvalidFormat(String),
    /// External operation exceeded its deadline
    Timeout(String),
    /// External process failed to start or exited unsuccessfully
    ProcessFailed(String),
    /// Network request failed
    NetworkError(String),
    /// File system operation failed
    FsFail(String),
    /// Processing error
    ProcessingError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            DomainError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            DomainError::ProcessFailed(msg) => write!(f, "Process failed: {}", msg),
            DomainError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

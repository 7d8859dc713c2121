// Local filesystem adapter - Output directories, screenshots and reports

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Local filesystem adapter
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
        let metadata = fs::metadata(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e)))?;
        Ok(())
    }

    async fn clean_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        if !dir_path.exists() {
            return self.create_directory(dir_path).await;
        }

        let entries = fs::read_dir(dir_path).map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", dir_path.display(), e))
        })?;
        for entry in entries {
            let entry = entry
                .map_err(|e| DomainError::FsFail(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| {
                    DomainError::FsFail(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
        }
        Ok(())
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn write_atomic(&self, file_path: &Path, contents: &[u8]) -> Result<(), DomainError> {
        let parent = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.create_directory(parent).await?;

        let mut temp_file = tempfile::Builder::new()
            .prefix(".acecap")
            .tempfile_in(parent)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(contents)
            .map_err(|e| DomainError::FsFail(format!("Failed to write temp file: {}", e)))?;
        temp_file.persist(file_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to move file to {}: {}",
                file_path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

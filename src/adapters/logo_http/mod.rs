//! HTTP logo fetcher with retry and content-hash deduplication

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::safe_filename;

const DEFAULT_LOGO_EXTENSION: &str = ".png";

/// Downloads logos into a directory, reusing identical files
pub struct HttpLogoAdapter {
    client: Client,
    logos_dir: PathBuf,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpLogoAdapter {
    pub fn new(
        logos_dir: impl Into<PathBuf>,
        request_timeout: Duration,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("acecap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            logos_dir: logos_dir.into(),
            max_retries: max_retries.max(1),
            retry_delay,
        })
    }

    async fn download_with_retry(&self, logo_url: &str) -> Result<Vec<u8>, DomainError> {
        let mut last_error = DomainError::NetworkError("no attempt made".to_string());
        for attempt in 1..=self.max_retries {
            match self.download_once(logo_url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    debug!("Logo attempt {}/{} failed: {}", attempt, self.max_retries, e);
                    last_error = e;
                }
            }
            if attempt < self.max_retries {
                sleep(self.retry_delay * attempt).await;
            }
        }
        Err(last_error)
    }

    async fn fetch_and_store(&self, logo_url: &str, channel_id: &str) -> Result<PathBuf, DomainError> {
        let contents = self.download_with_retry(logo_url).await?;
        let logos_dir = self.logos_dir.clone();
        let channel_id = channel_id.to_string();
        let extension = logo_extension(logo_url);
        tokio::task::spawn_blocking(move || store_logo(&logos_dir, &channel_id, &extension, &contents))
            .await
            .map_err(|e| DomainError::ProcessingError(format!("Logo store task failed: {}", e)))?
    }

    async fn download_once(&self, logo_url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(logo_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DomainError::NetworkError(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Extension of the URL path including the dot, `.png` when absent
pub fn logo_extension(logo_url: &str) -> String {
    Url::parse(logo_url)
        .ok()
        .and_then(|url| {
            let last = url.path_segments()?.last()?.to_string();
            Path::new(&last)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
        })
        .unwrap_or_else(|| DEFAULT_LOGO_EXTENSION.to_string())
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Store `contents` as `<id><ext>`, or `<id>-<n><ext>` when a different logo
/// already holds the name. An identical existing file is reused as-is.
pub fn store_logo(
    logos_dir: &Path,
    channel_id: &str,
    extension: &str,
    contents: &[u8],
) -> Result<PathBuf, DomainError> {
    let stem = safe_filename(channel_id);
    let new_hash = sha1_hex(contents);

    let mut candidate = logos_dir.join(format!("{}{}", stem, extension));
    let mut counter = 1;
    while candidate.exists() {
        let existing = std::fs::read(&candidate).map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", candidate.display(), e))
        })?;
        if sha1_hex(&existing) == new_hash {
            return Ok(candidate);
        }
        candidate = logos_dir.join(format!("{}-{}{}", stem, counter, extension));
        counter += 1;
    }

    std::fs::write(&candidate, contents).map_err(|e| {
        DomainError::FsFail(format!("Failed to write {}: {}", candidate.display(), e))
    })?;
    Ok(candidate)
}

#[async_trait]
impl LogoFetchPort for HttpLogoAdapter {
    async fn fetch_logo(&self, logo_url: &str, channel_id: &str) -> Option<PathBuf> {
        match self.fetch_and_store(logo_url, channel_id).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to download logo {}: {}", logo_url, e);
                None
            }
        }
    }
}

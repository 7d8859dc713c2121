//! M3U playlist adapter
//!
//! Extracts channel descriptors from `#EXTINF` entries that carry a logo, a
//! tvg-id and a group title, followed by an HTTP stream URL on the next line.

use std::path::Path;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::errors::*;
use crate::domain::model::ChannelDescriptor;
use crate::ports::*;

lazy_static! {
    /// Entry pattern; `(?s)` lets the lazy gaps span attribute line breaks
    static ref ENTRY_REGEX: Regex = Regex::new(
        r#"(?s)#EXTINF:-1.*?tvg-logo="(?P<logo_url>[^"]+)".*?tvg-id="(?P<tvg_id>[^"]+)".*?group-title="[^"]*",(?P<channel_name>[^\n]+)\n(?P<stream_url>http[^\n]+)"#
    )
    .expect("entry pattern is valid");
}

/// Parse playlist text into descriptors, in file order
pub fn parse_playlist(content: &str) -> Vec<ChannelDescriptor> {
    let normalized;
    let content = if content.contains('\r') {
        normalized = content.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        content
    };

    ENTRY_REGEX
        .captures_iter(content)
        .map(|caps| {
            ChannelDescriptor::new(
                &caps["logo_url"],
                &caps["tvg_id"],
                caps["channel_name"].trim(),
                caps["stream_url"].trim_end(),
            )
        })
        .collect()
}

/// Reads playlists from the local filesystem
pub struct M3uPlaylistAdapter;

impl M3uPlaylistAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for M3uPlaylistAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaylistPort for M3uPlaylistAdapter {
    async fn load_channels(&self, playlist_path: &Path) -> Result<Vec<ChannelDescriptor>, DomainError> {
        if !playlist_path.is_file() {
            return Err(DomainError::FileNotFound(format!(
                "Playlist does not exist: {}",
                playlist_path.display()
            )));
        }

        let content = tokio::fs::read_to_string(playlist_path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read playlist {}: {}",
                playlist_path.display(),
                e
            ))
        })?;

        Ok(parse_playlist(&content))
    }
}

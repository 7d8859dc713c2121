// Adapters - External system implementations

pub mod engine_health;
pub mod exec_ffmpeg;
pub mod fs_local;
pub mod image_luma;
pub mod logo_http;
pub mod m3u_playlist;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use engine_health::HttpEngineHealthAdapter;
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use image_luma::ImageLumaAdapter;
pub use logo_http::HttpLogoAdapter;
pub use m3u_playlist::M3uPlaylistAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;

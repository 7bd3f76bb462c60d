//! Server state and configuration.

use std::path::PathBuf;
use std::time::Duration;

use ab_glyph::FontArc;

use crate::error::CardsmithError;
use crate::fetch::{DEFAULT_FETCH_TIMEOUT_SECS, ImageFetcher};
use crate::render::raster::load_font;

/// Downloaded images unused for this long are evicted.
pub const CACHE_EXPIRATION_SECS: u64 = 600;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// TrueType font for PNG previews; the bitmap font is used without one
    pub font_path: Option<PathBuf>,
    /// Per-image download timeout
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            font_path: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub fetcher: ImageFetcher,
    pub font: Option<FontArc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, CardsmithError> {
        let fetcher = ImageFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
        let font = config.font_path.as_deref().map(load_font).transpose()?;
        Ok(Self { config, fetcher, font })
    }
}

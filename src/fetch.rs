//! # Remote Images
//!
//! Downloads the HTTP(S) image references of a template so the renderer can
//! draw them. Downloads are cached by URL; the server evicts entries that
//! have not been used for a while.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;
use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::error::CardsmithError;
use crate::render::images::{image_references, is_remote, load_local_images};
use crate::resolve::ProfileData;
use crate::template::Template;

/// Default per-request download timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// A downloaded image and when it was last used.
#[derive(Clone)]
pub struct CachedImage {
    pub image: DynamicImage,
    pub last_accessed: Instant,
}

impl CachedImage {
    fn new(image: DynamicImage) -> Self {
        Self {
            image,
            last_accessed: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// HTTP client plus a shared download cache. Cheap to clone.
#[derive(Clone)]
pub struct ImageFetcher {
    http_client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CachedImage>>>,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, CardsmithError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("cardsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CardsmithError::Image(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            http_client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Download and decode one image, using the cache when possible.
    pub async fn fetch(&self, url: &str) -> Result<DynamicImage, CardsmithError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(entry) = cache.get_mut(url) {
                entry.touch();
                return Ok(entry.image.clone());
            }
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CardsmithError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(CardsmithError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CardsmithError::Image(format!("Failed to read image data: {}", e)))?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| CardsmithError::Image(format!("Failed to decode image: {}", e)))?;
        tracing::debug!(url, width = image.width(), height = image.height(), "downloaded image");

        self.cache
            .write()
            .await
            .insert(url.to_string(), CachedImage::new(image.clone()));
        Ok(image)
    }

    /// Download every remote reference concurrently. Failures are logged
    /// and left out of the result; non-remote references are ignored.
    pub async fn fetch_all(&self, references: &[String]) -> HashMap<String, DynamicImage> {
        let mut tasks = JoinSet::new();
        for url in references.iter().filter(|r| is_remote(r)) {
            let fetcher = self.clone();
            let url = url.clone();
            tasks.spawn(async move {
                let result = fetcher.fetch(&url).await;
                (url, result)
            });
        }

        let mut images = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(image))) => {
                    images.insert(url, image);
                }
                Ok((url, Err(e))) => tracing::warn!(url = %url, error = %e, "image unavailable"),
                Err(e) => tracing::warn!(error = %e, "image download task failed"),
            }
        }
        images
    }

    /// Gather every image a render of `template` needs. Local paths are
    /// read relative to `base_dir` when one is given and skipped otherwise.
    pub async fn gather(
        &self,
        template: &Template,
        profile: &ProfileData,
        base_dir: Option<&Path>,
    ) -> HashMap<String, DynamicImage> {
        let references = image_references(template, profile);
        let mut images = self.fetch_all(&references).await;
        if let Some(dir) = base_dir {
            images.extend(load_local_images(&references, dir));
        }
        images
    }

    /// Drop cache entries unused for longer than `max_age`. Returns how
    /// many were removed.
    pub async fn evict_expired(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, entry| now.duration_since(entry.last_accessed) < max_age);
        before - cache.len()
    }

    pub async fn cached(&self) -> usize {
        self.cache.read().await.len()
    }
}

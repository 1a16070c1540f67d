use super::{OptimizeService, OptimizedImage, SizeProfile};
use crate::{Error, Result};
use async_trait::async_trait;
use image::imageops::FilterType;

/// Decode, bounded resize, lossy WebP re-encode.
///
/// A pure transform: no retries, no caches, no shared state. Failures
/// are fatal to the single call and surface as `Decode` or `Encode`
/// errors.
pub struct WebpOptimizer;

impl WebpOptimizer {
    pub fn new() -> Self {
        Self
    }

    fn optimize_sync(data: &[u8], profile: SizeProfile) -> Result<OptimizedImage> {
        profile.validate()?;

        let img = image::load_from_memory(data)?;
        let (width, height) = (img.width(), img.height());
        let (target_width, target_height) = profile.target_dimensions(width, height);

        if target_width == 0 || target_height == 0 {
            return Err(Error::Encode(format!(
                "Target surface {}x{} has zero area",
                target_width, target_height
            )));
        }

        let resized = if (target_width, target_height) == (width, height) {
            img
        } else {
            img.resize_exact(target_width, target_height, FilterType::Lanczos3)
        };

        let rgba = resized.to_rgba8();
        let encoded = webp::Encoder::from_rgba(rgba.as_raw(), target_width, target_height)
            .encode_simple(false, profile.quality * 100.0)
            .map_err(|e| Error::Encode(format!("WebP encoder rejected frame: {:?}", e)))?;

        Ok(OptimizedImage {
            bytes: encoded.to_vec(),
            width: target_width,
            height: target_height,
        })
    }
}

impl Default for WebpOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptimizeService for WebpOptimizer {
    async fn optimize(&self, data: &[u8], profile: SizeProfile) -> Result<OptimizedImage> {
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || Self::optimize_sync(&data, profile))
            .await
            .map_err(|e| Error::Generic(format!("Image task join error: {}", e)))?
    }
}

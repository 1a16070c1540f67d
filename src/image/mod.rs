//! Listing photo optimization
//!
//! Decodes a photo, fits it inside a size profile's bounding box with
//! high-quality resampling, and re-encodes it as lossy WebP for compact
//! persistence.

pub mod mock;
pub mod optimizer;
pub mod profile;

pub use mock::MockOptimizer;
pub use optimizer::WebpOptimizer;
pub use profile::SizeProfile;

use crate::Result;
use async_trait::async_trait;

/// Re-encoded photo plus the dimensions of the rendered surface.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait OptimizeService: Send + Sync {
    async fn optimize(&self, data: &[u8], profile: SizeProfile) -> Result<OptimizedImage>;
}

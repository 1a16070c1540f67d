//! Size profiles for listing photos.
//!
//! Each listing kind has a fixed bounding box and encoder quality.
//! Profiles never cause upscaling and always preserve aspect ratio.

use crate::models::ListingKind;
use crate::{Error, Result};

/// Bounding box and lossy-encoder quality for one class of photo.
///
/// Invariants: both dimensions strictly positive, quality in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeProfile {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: f32,
}

pub const PRODUCT: SizeProfile = SizeProfile {
    max_width: 800,
    max_height: 800,
    quality: 0.85,
};

pub const SERVICE: SizeProfile = SizeProfile {
    max_width: 800,
    max_height: 800,
    quality: 0.85,
};

pub const HOUSE: SizeProfile = SizeProfile {
    max_width: 1200,
    max_height: 900,
    quality: 0.85,
};

pub const THUMBNAIL: SizeProfile = SizeProfile {
    max_width: 400,
    max_height: 400,
    quality: 0.80,
};

impl SizeProfile {
    /// Caller-supplied override; the named constants are valid by
    /// construction.
    pub fn new(max_width: u32, max_height: u32, quality: f32) -> Result<Self> {
        let profile = Self {
            max_width,
            max_height,
            quality,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn for_listing(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Product => PRODUCT,
            ListingKind::Service => SERVICE,
            ListingKind::House => HOUSE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(Error::Profile(format!(
                "Zero-area bounding box {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(Error::Profile(format!(
                "Quality {} outside (0, 1]",
                self.quality
            )));
        }
        Ok(())
    }

    /// Target dimensions for a source image of `width` x `height`.
    ///
    /// A source that already fits is returned unchanged. Otherwise both
    /// axes are scaled by the same factor so the result stays inside the
    /// bounding box, rounded to the nearest pixel. An extreme aspect
    /// ratio can round an axis down to zero; the encoder rejects that
    /// surface downstream.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= self.max_width && height <= self.max_height {
            return (width, height);
        }

        let scale = f64::min(
            self.max_width as f64 / width as f64,
            self.max_height as f64 / height as f64,
        );

        (
            (width as f64 * scale).round() as u32,
            (height as f64 * scale).round() as u32,
        )
    }
}

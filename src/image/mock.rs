use super::{OptimizeService, OptimizedImage, SizeProfile};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub struct MockOptimizer {
    optimize_count: Arc<Mutex<usize>>,
    source_dimensions: (u32, u32),
    should_fail: Arc<Mutex<bool>>,
}

impl MockOptimizer {
    pub fn new() -> Self {
        Self {
            optimize_count: Arc::new(Mutex::new(0)),
            source_dimensions: (100, 100),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Pretend every input decodes to this size.
    pub fn with_source_dimensions(mut self, width: u32, height: u32) -> Self {
        self.source_dimensions = (width, height);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_optimize_count(&self) -> usize {
        *self.optimize_count.lock().unwrap()
    }
}

impl Default for MockOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptimizeService for MockOptimizer {
    async fn optimize(&self, _data: &[u8], profile: SizeProfile) -> Result<OptimizedImage> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Decode(image::ImageError::IoError(
                std::io::Error::other("Mock failure"),
            )));
        }

        let mut count = self.optimize_count.lock().unwrap();
        *count += 1;

        let (width, height) = self.source_dimensions;
        let (target_width, target_height) = profile.target_dimensions(width, height);

        Ok(OptimizedImage {
            bytes: b"RIFFmockWEBPmock".to_vec(),
            width: target_width,
            height: target_height,
        })
    }
}

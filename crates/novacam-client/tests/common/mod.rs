//! Shared fixtures for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::DynamicImage;
use novacam_client::{DecodeError, FrameDecoder};

/// Decoder stub that accepts anything and counts how often it ran.
#[derive(Default)]
pub struct StubDecoder {
    pub calls: Arc<AtomicUsize>,
}

impl StubDecoder {
    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameDecoder for StubDecoder {
    fn decode(&mut self, _jpeg: &[u8]) -> Result<DynamicImage, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DynamicImage::new_rgb8(4, 4))
    }
}

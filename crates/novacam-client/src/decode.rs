//! Frame decoder seam.
//!
//! Decoding is delegated to an external codec; the default implementation
//! wraps the `image` crate's JPEG support. The seam exists so tests can stub
//! or count decode calls without carrying real JPEG data.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Whatever the external codec reported, carried through unchanged.
#[derive(Error, Debug)]
#[error("decode failed: {0}")]
pub struct DecodeError(String);

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Turns a complete JPEG buffer into a decoded image.
pub trait FrameDecoder: Send {
    fn decode(&mut self, jpeg: &[u8]) -> Result<DynamicImage, DecodeError>;
}

/// JPEG decoder backed by the `image` crate.
#[derive(Debug, Default)]
pub struct JpegDecoder;

impl FrameDecoder for JpegDecoder {
    fn decode(&mut self, jpeg: &[u8]) -> Result<DynamicImage, DecodeError> {
        image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
            .map_err(|e| DecodeError(e.to_string()))
    }
}

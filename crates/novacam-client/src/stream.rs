//! Stream channel orchestration.
//!
//! [`StreamClient`] owns one stream session and repeatedly acquires frames,
//! applying the decode/skip cadence and keeping the per-client frame
//! counter. The counter belongs to this instance alone and resets only by
//! recreating the client.

use image::DynamicImage;
use tracing::{debug, warn};

use novacam_transport::StreamTransport;

use crate::assembler;
use crate::decode::{DecodeError, FrameDecoder, JpegDecoder};
use crate::error::AcquireError;

/// Outcome of one [`StreamClient::grab`] call.
#[derive(Debug)]
pub enum GrabOutcome {
    /// A frame was received and decoded.
    Image(DynamicImage),
    /// A frame was received but fell on the skip side of the cadence; its
    /// bytes were discarded undecoded.
    Skipped { len: usize },
    /// No frame this attempt.
    NoFrame(AcquireError),
    /// The frame arrived intact but the codec rejected it.
    DecodeFailed(DecodeError),
}

impl GrabOutcome {
    /// The decoded image, if this grab produced one.
    pub fn into_image(self) -> Option<DynamicImage> {
        match self {
            GrabOutcome::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Frame acquisition loop over one stream session.
pub struct StreamClient<D = JpegDecoder> {
    session: Box<dyn StreamTransport>,
    decoder: D,
    skip_frames: u32,
    frame_count: u64,
}

impl<D: FrameDecoder> StreamClient<D> {
    /// Wrap a connected session. `skip_frames = N` decodes every (N+1)-th
    /// frame, starting with the first; 0 decodes every frame.
    pub fn new(session: Box<dyn StreamTransport>, decoder: D, skip_frames: u32) -> Self {
        Self {
            session,
            decoder,
            skip_frames,
            frame_count: 0,
        }
    }

    /// Grabs attempted so far, successful or not.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Acquire one frame and run it through the cadence policy.
    ///
    /// The counter advances exactly once per call whatever the outcome, so
    /// the cadence stays aligned with attempts rather than with successes.
    /// Failures are reported, not raised; retrying is the caller's loop.
    pub async fn grab(&mut self) -> GrabOutcome {
        let decode_this = self.frame_count % (1 + u64::from(self.skip_frames)) == 0;
        self.frame_count += 1;

        let jpeg = match assembler::acquire_frame(self.session.as_mut()).await {
            Ok(jpeg) => jpeg,
            Err(err) => {
                match &err {
                    AcquireError::Timeout => debug!(attempt = self.frame_count, "grab: {err}"),
                    _ => warn!(attempt = self.frame_count, "grab: {err}"),
                }
                return GrabOutcome::NoFrame(err);
            }
        };

        if !decode_this {
            debug!(len = jpeg.len(), "frame skipped by cadence");
            return GrabOutcome::Skipped { len: jpeg.len() };
        }

        match self.decoder.decode(&jpeg) {
            Ok(image) => GrabOutcome::Image(image),
            Err(err) => {
                warn!(attempt = self.frame_count, "grab: {err}");
                GrabOutcome::DecodeFailed(err)
            }
        }
    }

    /// Close the session, notifying the camera when the transport needs it.
    pub async fn close(self) -> novacam_transport::Result<()> {
        self.session.close().await
    }
}

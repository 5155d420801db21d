//! In-memory session and decoder doubles for unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;

use novacam_core::TransportMode;
use novacam_transport::{StreamTransport, TransportError};

use crate::decode::{DecodeError, FrameDecoder};

/// Stream session replaying a scripted chunk sequence. An exhausted script
/// reads as a silent peer (timeout).
pub(crate) struct ScriptedTransport {
    mode: TransportMode,
    chunks: VecDeque<Result<Bytes, TransportError>>,
    /// Honor `max_len` the way a real socket read does. Disable to exercise
    /// the assembler's guard against a misbehaving transport.
    truncates: bool,
    pub pings: usize,
    pub requests: Vec<usize>,
}

impl ScriptedTransport {
    pub fn udp() -> Self {
        Self::new(TransportMode::Udp)
    }

    pub fn tcp() -> Self {
        Self::new(TransportMode::Tcp)
    }

    fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            chunks: VecDeque::new(),
            truncates: true,
            pings: 0,
            requests: Vec::new(),
        }
    }

    pub fn without_truncation(mut self) -> Self {
        self.truncates = false;
        self
    }

    pub fn push(&mut self, chunk: Vec<u8>) {
        self.chunks.push_back(Ok(Bytes::from(chunk)));
    }

    pub fn push_err(&mut self, err: TransportError) {
        self.chunks.push_back(Err(err));
    }

    /// Drain the remaining scripted chunks, e.g. to splice into another
    /// script.
    pub fn into_chunks(self) -> impl Iterator<Item = Vec<u8>> {
        self.chunks
            .into_iter()
            .filter_map(|chunk| chunk.ok().map(|bytes| bytes.to_vec()))
    }
}

#[async_trait]
impl StreamTransport for ScriptedTransport {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    async fn send_ping(&mut self) -> novacam_transport::Result<()> {
        self.pings += 1;
        Ok(())
    }

    async fn recv_chunk(&mut self, max_len: usize) -> novacam_transport::Result<Bytes> {
        self.requests.push(max_len);
        match self.chunks.pop_front() {
            Some(Ok(chunk)) if self.truncates => Ok(chunk.slice(..chunk.len().min(max_len))),
            Some(result) => result,
            None => Err(TransportError::Timeout),
        }
    }

    async fn close(self: Box<Self>) -> novacam_transport::Result<()> {
        Ok(())
    }
}

/// Decoder double that counts invocations and always succeeds.
#[derive(Default)]
pub(crate) struct CountingDecoder {
    pub calls: usize,
}

impl FrameDecoder for CountingDecoder {
    fn decode(&mut self, _jpeg: &[u8]) -> Result<DynamicImage, DecodeError> {
        self.calls += 1;
        Ok(DynamicImage::new_rgb8(2, 2))
    }
}

/// Decoder double that rejects everything.
#[derive(Default)]
pub(crate) struct FailingDecoder;

impl FrameDecoder for FailingDecoder {
    fn decode(&mut self, _jpeg: &[u8]) -> Result<DynamicImage, DecodeError> {
        Err(DecodeError::new("scripted failure"))
    }
}

//! Stream session trait definitions.

use async_trait::async_trait;
use bytes::Bytes;
use novacam_core::TransportMode;

use crate::error::Result;

/// Capability set of one open stream session, uniform over UDP and TCP.
///
/// A session is strictly request/response: [`send_ping`](Self::send_ping)
/// asks the camera for exactly one frame, which the caller then drains with
/// [`recv_chunk`](Self::recv_chunk). The trait takes `&mut self` throughout
/// so a second in-flight request on the same session is unrepresentable, and
/// [`close`](Self::close) consumes the session so it cannot be used, or
/// closed, twice.
#[async_trait]
pub trait StreamTransport: Send {
    /// The framing variant this session speaks.
    fn mode(&self) -> TransportMode;

    /// Trigger transmission of one frame.
    async fn send_ping(&mut self) -> Result<()>;

    /// Receive up to `max_len` newly arrived bytes.
    ///
    /// UDP returns exactly one datagram (never split, never coalesced by the
    /// transport); TCP may return fewer bytes than requested and must be
    /// called again. Fails with [`TransportError::Timeout`] when nothing
    /// arrives within the session's receive deadline.
    ///
    /// [`TransportError::Timeout`]: crate::TransportError::Timeout
    async fn recv_chunk(&mut self, max_len: usize) -> Result<Bytes>;

    /// Tear the session down. The UDP variant notifies the camera with a
    /// DISCONNECT datagram before releasing the socket.
    async fn close(self: Box<Self>) -> Result<()>;
}

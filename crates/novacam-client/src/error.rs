//! Client error types.

use thiserror::Error;

use novacam_transport::TransportError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Why one frame acquisition attempt yielded no frame.
///
/// Acquisition failures never escalate past `grab()`; each one costs exactly
/// the attempt it occurred in. `Transport` is kept distinct from `Timeout`
/// because it can mean a dead connection — whether to reconnect is the
/// caller's decision.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// Nothing arrived within the receive deadline.
    #[error("receive deadline elapsed")]
    Timeout,

    /// The byte stream violated the framing protocol. The attempt is
    /// abandoned; no partial frame surfaces.
    #[error("framing error: {0}")]
    Framing(#[from] novacam_core::Error),

    /// Socket-level failure other than a timeout.
    #[error("transport error: {0}")]
    Transport(TransportError),
}

impl From<TransportError> for AcquireError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => AcquireError::Timeout,
            other => AcquireError::Transport(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("not connected")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

//! Transport error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("receive deadline elapsed")]
    Timeout,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

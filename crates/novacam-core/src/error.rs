//! Protocol error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Violations of the stream channel's framing rules.
#[derive(Error, Debug)]
pub enum Error {
    /// Announcement datagram of the wrong length.
    #[error("invalid announcement: expected 256 bytes, got {len}")]
    InvalidAnnouncement { len: usize },

    /// Declared frame size outside the plausible range.
    #[error("implausible declared frame size: {size} bytes")]
    ImplausibleSize { size: u32 },

    /// Reassembled frame does not end with the EOI marker.
    #[error("frame missing EOI trailer")]
    MissingEoi,

    /// More payload bytes arrived than the announcement declared.
    #[error("payload exceeds declared size: {got} > {declared}")]
    Oversized { got: usize, declared: usize },
}

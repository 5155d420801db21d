//! Frame announcement decoding.
//!
//! Before a UDP frame is transmitted the camera emits one 256-byte
//! announcement datagram: a big-endian u32 payload type at offset 0 and a
//! big-endian u32 payload length at offset 4, the rest padding. Only payload
//! type 1 announces a JPEG frame.

use bytes::Buf;

use crate::error::{Error, Result};
use crate::wire::{ANNOUNCEMENT_LEN, PAYLOAD_TYPE_FRAME};

/// Decoded frame announcement header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementHeader {
    pub payload_type: u32,
    pub payload_len: u32,
}

impl AnnouncementHeader {
    /// Decode an announcement datagram.
    ///
    /// The input must be exactly 256 bytes; nothing beyond the length is
    /// validated here. Whether the payload type is recognized is the
    /// caller's decision ([`AnnouncementHeader::is_frame`]).
    pub fn decode(mut buf: &[u8]) -> Result<Self> {
        if buf.len() != ANNOUNCEMENT_LEN {
            return Err(Error::InvalidAnnouncement { len: buf.len() });
        }
        let payload_type = buf.get_u32();
        let payload_len = buf.get_u32();
        Ok(Self {
            payload_type,
            payload_len,
        })
    }

    /// Whether this header announces a JPEG frame.
    pub fn is_frame(&self) -> bool {
        self.payload_type == PAYLOAD_TYPE_FRAME
    }
}

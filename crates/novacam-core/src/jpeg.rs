//! JPEG marker scanning and the declared-size sanity gate.
//!
//! The TCP stream variant embeds a 4-byte big-endian length prefix directly
//! in front of the JPEG Start-Of-Image marker, so the frame prologue has to
//! be located by scanning. UDP needs none of this; its announcement arrives
//! as a dedicated datagram.

/// Start-Of-Image marker.
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End-Of-Image marker.
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Exclusive lower bound on a plausible declared frame size.
pub const MIN_DECLARED_SIZE: u32 = 50_000;

/// Exclusive upper bound on a plausible declared frame size.
pub const MAX_DECLARED_SIZE: u32 = 512_000;

/// Scan `buf` for an embedded frame prologue: a 4-byte length prefix
/// immediately followed by the SOI marker. Returns the offset of the first
/// payload byte (just past the prefix), or `None` when no prologue is
/// present.
///
/// The scan range is bounded to `len - 6` so a short buffer is never
/// over-read.
pub fn find_start_of_image(buf: &[u8]) -> Option<usize> {
    if buf.len() < 6 {
        return None;
    }
    (0..buf.len() - 6)
        .find(|&i| buf[i + 4] == SOI[0] && buf[i + 5] == SOI[1])
        .map(|i| i + 4)
}

/// Sanity gate for a declared size recovered by the prologue scan. Bounds
/// are exclusive; anything outside is a corrupt length field, not a frame.
pub fn declared_size_in_range(size: u32) -> bool {
    size > MIN_DECLARED_SIZE && size < MAX_DECLARED_SIZE
}

/// Whether `buf` ends with the EOI trailer.
pub fn has_end_of_image(buf: &[u8]) -> bool {
    buf.len() >= 2 && buf[buf.len() - 2..] == EOI
}

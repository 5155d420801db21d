//! Frame acquisition state machine.
//!
//! One call to [`acquire_frame`] drives a connected stream session through a
//! full request/response cycle: ping the camera, locate the frame prologue,
//! accumulate the declared payload, validate the EOI trailer. The assembler
//! keeps no state across calls; everything lives in the session and the
//! local frame buffer, which is dropped on any failure so a partial frame
//! never escapes.
//!
//! The two transports frame differently. UDP announces a frame with a
//! dedicated 256-byte header datagram and then sends bare payload datagrams.
//! TCP splices a 4-byte big-endian length prefix into the byte stream,
//! either alone or glued to the front of the first payload chunk, so the
//! prologue has to be found by scanning for the SOI marker.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use novacam_core::wire::{MAX_ANNOUNCE_DATAGRAM, TCP_RECV_CHUNK, UDP_PAYLOAD_CHUNK};
use novacam_core::{jpeg, AnnouncementHeader, Error as FramingError, TransportMode};
use novacam_transport::StreamTransport;

use crate::error::AcquireError;

/// Acquire one frame: ping, detect, accumulate, validate.
///
/// Returns the complete JPEG buffer, or a tagged failure for this attempt.
/// Retry policy belongs to the caller; the protocol allows at most one
/// in-flight frame per ping, which the `&mut` session borrow guarantees.
pub async fn acquire_frame(
    session: &mut dyn StreamTransport,
) -> std::result::Result<Bytes, AcquireError> {
    session.send_ping().await?;
    match session.mode() {
        TransportMode::Udp => acquire_udp(session).await,
        TransportMode::Tcp => acquire_tcp(session).await,
    }
}

async fn acquire_udp(
    session: &mut dyn StreamTransport,
) -> std::result::Result<Bytes, AcquireError> {
    // Hunt for the announcement. Anything that is not a 256-byte type-1
    // header is unrelated traffic, not a protocol violation.
    let declared = loop {
        let datagram = session.recv_chunk(MAX_ANNOUNCE_DATAGRAM).await?;
        let Ok(header) = AnnouncementHeader::decode(&datagram) else {
            trace!(len = datagram.len(), "skipping non-announcement datagram");
            continue;
        };
        if header.is_frame() {
            break header.payload_len as usize;
        }
        trace!(
            payload_type = header.payload_type,
            "skipping announcement of other payload"
        );
    };
    debug!(declared, "frame announced");

    // The announcement carries no payload bytes of its own; the UDP path
    // also applies no size gate to the declared length. The device's header
    // is trusted here, unlike the TCP scan.
    let mut frame = BytesMut::with_capacity(declared);
    while frame.len() < declared {
        let want = (declared - frame.len()).min(UDP_PAYLOAD_CHUNK);
        let datagram = session.recv_chunk(want).await?;
        frame.put_slice(&datagram);
    }

    finish(frame, declared)
}

async fn acquire_tcp(
    session: &mut dyn StreamTransport,
) -> std::result::Result<Bytes, AcquireError> {
    // Find the prologue. Chunks accumulate in `scan` so a prefix or SOI
    // split across receive boundaries still matches on a later pass.
    let mut scan = BytesMut::new();
    let (declared, seed) = loop {
        let chunk = session.recv_chunk(TCP_RECV_CHUNK).await?;
        scan.put_slice(&chunk);

        // A bare length prefix arrives as exactly 4 bytes with no payload
        // attached; the marker scan below cannot see it because no SOI has
        // arrived yet. No size gate on this path.
        if scan.len() == 4 {
            let declared = u32::from_be_bytes([scan[0], scan[1], scan[2], scan[3]]);
            break (declared as usize, BytesMut::new());
        }

        if let Some(payload_at) = jpeg::find_start_of_image(&scan) {
            let prefix = &scan[payload_at - 4..payload_at];
            let declared = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
            if !jpeg::declared_size_in_range(declared) {
                // One corrupt prologue aborts the attempt. Scanning on would
                // resynchronize somewhere inside the payload.
                return Err(FramingError::ImplausibleSize { size: declared }.into());
            }
            let _ = scan.split_to(payload_at);
            break (declared as usize, scan);
        }
    };
    debug!(declared, seeded = seed.len(), "frame prologue found");

    let mut frame = seed;
    frame.reserve(declared.saturating_sub(frame.len()));
    while frame.len() < declared {
        let chunk = session.recv_chunk(declared - frame.len()).await?;
        frame.put_slice(&chunk);
    }

    finish(frame, declared)
}

/// Final validation shared by both paths.
fn finish(frame: BytesMut, declared: usize) -> std::result::Result<Bytes, AcquireError> {
    if frame.len() > declared {
        return Err(FramingError::Oversized {
            got: frame.len(),
            declared,
        }
        .into());
    }
    if !jpeg::has_end_of_image(&frame) {
        return Err(FramingError::MissingEoi.into());
    }
    Ok(frame.freeze())
}

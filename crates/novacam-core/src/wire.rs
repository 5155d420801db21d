//! Control messages and framing constants shared by both stream transports.

/// Control message requesting transmission of exactly one frame.
pub const PING: &[u8] = b"PING";

/// Control datagram ending a UDP streaming session.
pub const DISCONNECT: &[u8] = b"DISCONNECT";

/// Length of a frame announcement datagram (UDP).
pub const ANNOUNCEMENT_LEN: usize = 256;

/// Payload type tag announcing a JPEG frame. Announcements with any other
/// tag are unrelated traffic.
pub const PAYLOAD_TYPE_FRAME: u32 = 1;

/// Upper bound on any datagram received while waiting for an announcement.
pub const MAX_ANNOUNCE_DATAGRAM: usize = 1502;

/// Largest payload datagram the camera emits (UDP).
pub const UDP_PAYLOAD_CHUNK: usize = 1460;

/// Receive granularity while hunting for the TCP frame prologue.
pub const TCP_RECV_CHUNK: usize = 1436;

/// Fixed size of one command channel response read.
pub const COMMAND_RESPONSE_LEN: usize = 100;

/// Socket receive buffer requested for both channels, in bytes.
pub const RECV_BUFFER_SIZE: usize = 65536 * 12;

/// UDP hello telling the camera which local port replies should target.
pub fn connect_message(local_port: u16) -> String {
    format!("CONNECT {local_port}")
}

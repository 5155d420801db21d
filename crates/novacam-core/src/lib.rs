//! Novacam Core
//!
//! Wire-level primitives for the Nova camera's pull-based streaming protocol.
//! The camera exposes two channels: an ASCII command channel and a binary
//! stream channel that delivers one JPEG frame per PING. This crate holds the
//! pieces both the transport and client layers need:
//!
//! - Frame announcement decoding ([`AnnouncementHeader`])
//! - JPEG marker scanning and the declared-size gate ([`jpeg`])
//! - Endpoint addressing and transport selection ([`Endpoint`], [`TransportMode`])
//! - Control message constants ([`wire`])

pub mod announce;
pub mod endpoint;
pub mod error;
pub mod jpeg;
pub mod wire;

pub use announce::AnnouncementHeader;
pub use endpoint::{Endpoint, TransportMode};
pub use error::{Error, Result};

/// Default TCP port of the command channel.
pub const COMMAND_PORT: u16 = 1335;

/// Default port of the stream channel, UDP and TCP variants alike.
pub const STREAM_PORT: u16 = 1334;

//! Camera endpoint addressing.

use std::fmt;

use crate::{COMMAND_PORT, STREAM_PORT};

/// Which transport carries the stream channel. Fixed for the lifetime of a
/// session; the framing variant follows from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Udp,
    Tcp,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Udp => f.write_str("udp"),
            TransportMode::Tcp => f.write_str("tcp"),
        }
    }
}

/// A camera's network location. Immutable once a session is established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub command_port: u16,
    pub stream_port: u16,
}

impl Endpoint {
    /// Endpoint with the factory-default ports.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            command_port: COMMAND_PORT,
            stream_port: STREAM_PORT,
        }
    }

    pub fn command_addr(&self) -> String {
        format!("{}:{}", self.host, self.command_port)
    }

    pub fn stream_addr(&self) -> String {
        format!("{}:{}", self.host, self.stream_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports() {
        let endpoint = Endpoint::new("192.168.0.90");
        assert_eq!(endpoint.command_addr(), "192.168.0.90:1335");
        assert_eq!(endpoint.stream_addr(), "192.168.0.90:1334");
    }
}

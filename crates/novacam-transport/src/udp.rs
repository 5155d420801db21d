//! UDP stream session.
//!
//! The camera streams to whatever address last issued `CONNECT`, so the
//! session binds the stream port locally (replies are addressed there) and
//! introduces itself before the first ping.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, info};

use novacam_core::wire::{self, DISCONNECT, MAX_ANNOUNCE_DATAGRAM, PING, RECV_BUFFER_SIZE};
use novacam_core::{Endpoint, TransportMode};

use crate::error::{Result, TransportError};
use crate::traits::StreamTransport;

/// UDP session configuration.
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Receive deadline applied to every `recv_chunk` call.
    pub recv_timeout: Duration,
    /// Socket receive buffer (SO_RCVBUF) in bytes.
    pub recv_buffer_size: usize,
    /// Local port to bind. Defaults to the camera's stream port, which the
    /// device expects; streaming from several cameras at once needs distinct
    /// local ports. `Some(0)` binds an ephemeral port.
    pub local_port: Option<u16>,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_secs(1),
            recv_buffer_size: RECV_BUFFER_SIZE,
            local_port: None,
        }
    }
}

/// One UDP streaming session.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    recv_timeout: Duration,
    scratch: Vec<u8>,
}

impl UdpTransport {
    /// Bind a local stream socket and introduce it to the camera with a
    /// `CONNECT` datagram carrying the bound port.
    pub async fn connect(endpoint: &Endpoint, config: UdpConfig) -> Result<Self> {
        let bind_port = config.local_port.unwrap_or(endpoint.stream_port);
        let socket = UdpSocket::bind(("0.0.0.0", bind_port))
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let sock_ref = socket2::SockRef::from(&socket);
        let _ = sock_ref.set_recv_buffer_size(config.recv_buffer_size);

        let local_port = socket
            .local_addr()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
            .port();

        let peer = tokio::net::lookup_host(endpoint.stream_addr())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
            .next()
            .ok_or_else(|| {
                TransportError::ConnectionFailed(format!("no address for {}", endpoint.host))
            })?;

        let hello = wire::connect_message(local_port);
        socket
            .send_to(hello.as_bytes(), peer)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        info!(%peer, local_port, "udp stream session open");

        Ok(Self {
            socket,
            peer,
            recv_timeout: config.recv_timeout,
            scratch: vec![0u8; MAX_ANNOUNCE_DATAGRAM],
        })
    }

    pub fn local_port(&self) -> Option<u16> {
        self.socket.local_addr().ok().map(|addr| addr.port())
    }
}

#[async_trait]
impl StreamTransport for UdpTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Udp
    }

    async fn send_ping(&mut self) -> Result<()> {
        self.socket
            .send_to(PING, self.peer)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn recv_chunk(&mut self, max_len: usize) -> Result<Bytes> {
        // A datagram longer than `max_len` is truncated by the socket layer,
        // same as the recvfrom contract the device was designed against.
        let want = max_len.min(self.scratch.len());
        let (len, from) = timeout(
            self.recv_timeout,
            self.socket.recv_from(&mut self.scratch[..want]),
        )
        .await
        .map_err(|_| TransportError::Timeout)??;
        debug!(len, %from, "udp chunk");
        Ok(Bytes::copy_from_slice(&self.scratch[..len]))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.socket
            .send_to(DISCONNECT, self.peer)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        debug!(peer = %self.peer, "udp stream session closed");
        Ok(())
    }
}

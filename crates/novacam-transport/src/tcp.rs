//! TCP stream session.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use novacam_core::wire::{PING, RECV_BUFFER_SIZE};
use novacam_core::{Endpoint, TransportMode};

use crate::error::{Result, TransportError};
use crate::traits::StreamTransport;

/// TCP session configuration.
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// Receive deadline applied to every `recv_chunk` call.
    pub recv_timeout: Duration,
    /// Socket receive buffer (SO_RCVBUF) in bytes.
    pub recv_buffer_size: usize,
    /// Scratch buffer size; bounds how much one `recv_chunk` call returns.
    pub read_buffer_size: usize,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_secs(1),
            recv_buffer_size: RECV_BUFFER_SIZE,
            read_buffer_size: 64 * 1024,
        }
    }
}

/// One TCP streaming session.
pub struct TcpTransport {
    stream: TcpStream,
    recv_timeout: Duration,
    scratch: Vec<u8>,
}

impl TcpTransport {
    pub async fn connect(endpoint: &Endpoint, config: TcpConfig) -> Result<Self> {
        let stream = TcpStream::connect(endpoint.stream_addr())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        // The ping must reach the camera immediately, not sit in Nagle's
        // buffer while both ends wait.
        stream.set_nodelay(true)?;

        let sock_ref = socket2::SockRef::from(&stream);
        let _ = sock_ref.set_recv_buffer_size(config.recv_buffer_size);

        info!(addr = %endpoint.stream_addr(), "tcp stream session open");

        Ok(Self {
            stream,
            recv_timeout: config.recv_timeout,
            scratch: vec![0u8; config.read_buffer_size],
        })
    }
}

#[async_trait]
impl StreamTransport for TcpTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Tcp
    }

    async fn send_ping(&mut self) -> Result<()> {
        self.stream
            .write_all(PING)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn recv_chunk(&mut self, max_len: usize) -> Result<Bytes> {
        let want = max_len.min(self.scratch.len());
        let len = timeout(self.recv_timeout, self.stream.read(&mut self.scratch[..want]))
            .await
            .map_err(|_| TransportError::Timeout)??;
        if len == 0 {
            return Err(TransportError::ConnectionClosed);
        }
        debug!(len, "tcp chunk");
        Ok(Bytes::copy_from_slice(&self.scratch[..len]))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut stream = self.stream;
        stream.shutdown().await?;
        debug!("tcp stream session closed");
        Ok(())
    }
}

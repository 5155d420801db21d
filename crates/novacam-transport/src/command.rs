//! Command channel transactions.
//!
//! ASCII line requests over a persistent TCP connection to the command port.
//! Responses are read as one bounded receive rather than scanned for a
//! delimiter, so replies longer than 100 bytes are truncated. Limitation
//! inherited from the camera firmware's own tooling; confirmed response
//! sizes all fit.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use novacam_core::wire::{COMMAND_RESPONSE_LEN, RECV_BUFFER_SIZE};
use novacam_core::Endpoint;

use crate::error::{Result, TransportError};

/// Command channel configuration.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Receive deadline applied to every response read.
    pub recv_timeout: Duration,
    /// Socket receive buffer (SO_RCVBUF) in bytes.
    pub recv_buffer_size: usize,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_secs(1),
            recv_buffer_size: RECV_BUFFER_SIZE,
        }
    }
}

/// Persistent connection to the camera's command port.
///
/// Transactions are strictly sequential: one request, one response, enforced
/// by `&mut self`.
pub struct CommandChannel {
    stream: TcpStream,
    recv_timeout: Duration,
}

impl CommandChannel {
    pub async fn connect(endpoint: &Endpoint, config: CommandConfig) -> Result<Self> {
        let stream = TcpStream::connect(endpoint.command_addr())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let sock_ref = socket2::SockRef::from(&stream);
        let _ = sock_ref.set_recv_buffer_size(config.recv_buffer_size);

        debug!(addr = %endpoint.command_addr(), "command channel open");

        Ok(Self {
            stream,
            recv_timeout: config.recv_timeout,
        })
    }

    /// Send one CRLF-terminated request and read its response.
    ///
    /// The response is a single bounded read: callers must not assume exactly
    /// one line comes back.
    pub async fn transact(&mut self, line: &str) -> Result<String> {
        let mut request = String::with_capacity(line.len() + 2);
        request.push_str(line);
        request.push_str("\r\n");
        self.stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        let mut buf = [0u8; COMMAND_RESPONSE_LEN];
        let len = timeout(self.recv_timeout, self.stream.read(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout)??;
        if len == 0 {
            return Err(TransportError::ConnectionClosed);
        }

        let response = String::from_utf8_lossy(&buf[..len]).into_owned();
        debug!(request = line, %response, "command transaction");
        Ok(response)
    }

    pub async fn close(self) -> Result<()> {
        let mut stream = self.stream;
        stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn test_config() -> CommandConfig {
        CommandConfig {
            recv_timeout: Duration::from_millis(200),
            ..CommandConfig::default()
        }
    }

    async fn listener_endpoint() -> (TcpListener, Endpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut endpoint = Endpoint::new("127.0.0.1");
        endpoint.command_port = listener.local_addr().unwrap().port();
        (listener, endpoint)
    }

    #[tokio::test]
    async fn request_is_crlf_terminated() {
        let (listener, endpoint) = listener_endpoint().await;

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 128];
            let len = peer.read(&mut buf).await.unwrap();
            peer.write_all(b"200OK").await.unwrap();
            String::from_utf8_lossy(&buf[..len]).into_owned()
        });

        let mut channel = CommandChannel::connect(&endpoint, test_config()).await.unwrap();
        let response = channel.transact("GetFirmwareVersion").await.unwrap();
        assert_eq!(response, "200OK");
        assert_eq!(server.await.unwrap(), "GetFirmwareVersion\r\n");
    }

    #[tokio::test]
    async fn response_read_is_bounded() {
        let (listener, endpoint) = listener_endpoint().await;

        tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 128];
            peer.read(&mut buf).await.unwrap();
            // More than one bounded read's worth.
            peer.write_all(&[b'x'; 300]).await.unwrap();
            peer.flush().await.unwrap();
            // Hold the connection open while the client reads.
            tokio::time::sleep(Duration::from_millis(300)).await;
        });

        let mut channel = CommandChannel::connect(&endpoint, test_config()).await.unwrap();
        let response = channel.transact("GetSystemInfo").await.unwrap();
        assert!(response.len() <= COMMAND_RESPONSE_LEN);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let (listener, endpoint) = listener_endpoint().await;

        let mut channel = CommandChannel::connect(&endpoint, test_config()).await.unwrap();
        let (_peer, _) = listener.accept().await.unwrap();

        let err = channel.transact("GetSerialNumber").await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout));
    }
}

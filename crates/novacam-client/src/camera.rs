//! Camera aggregate.

use tracing::info;

use novacam_core::{Endpoint, TransportMode};
use novacam_transport::{
    CommandChannel, CommandConfig, StreamTransport, TcpConfig, TcpTransport, UdpConfig,
    UdpTransport,
};

use crate::builder::{CameraBuilder, CameraSettings};
use crate::command::CommandClient;
use crate::decode::{FrameDecoder, JpegDecoder};
use crate::error::{ClientError, Result};
use crate::stream::{GrabOutcome, StreamClient};

/// One Nova camera: at most one command session plus one stream session.
///
/// Every method takes `&mut self`, so a second grab can never overlap an
/// in-flight one — the wire protocol's one-ping-one-frame contract is
/// enforced by the borrow checker rather than a runtime guard. The two
/// channels use separate sockets and may be connected and torn down
/// independently.
pub struct Camera<D: FrameDecoder + Default = JpegDecoder> {
    endpoint: Endpoint,
    settings: CameraSettings,
    command: Option<CommandClient>,
    stream: Option<StreamClient<D>>,
}

impl Camera<JpegDecoder> {
    pub fn builder(host: impl Into<String>) -> CameraBuilder {
        CameraBuilder::new(host)
    }
}

impl<D: FrameDecoder + Default> Camera<D> {
    pub(crate) fn from_parts(endpoint: Endpoint, settings: CameraSettings) -> Self {
        Self {
            endpoint,
            settings,
            command: None,
            stream: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Open the configuration channel.
    pub async fn connect_command(&mut self) -> Result<()> {
        if self.command.is_some() {
            return Err(ClientError::AlreadyConnected);
        }
        let config = CommandConfig {
            recv_timeout: self.settings.recv_timeout,
            recv_buffer_size: self.settings.recv_buffer_size,
        };
        let channel = CommandChannel::connect(&self.endpoint, config).await?;
        self.command = Some(CommandClient::new(channel));
        Ok(())
    }

    /// Open the stream channel over the chosen transport. A fresh stream
    /// session starts a fresh frame counter.
    pub async fn connect_stream(&mut self, mode: TransportMode) -> Result<()> {
        if self.stream.is_some() {
            return Err(ClientError::AlreadyConnected);
        }
        let session: Box<dyn StreamTransport> = match mode {
            TransportMode::Udp => {
                let config = UdpConfig {
                    recv_timeout: self.settings.recv_timeout,
                    recv_buffer_size: self.settings.recv_buffer_size,
                    local_port: self.settings.local_stream_port,
                };
                Box::new(UdpTransport::connect(&self.endpoint, config).await?)
            }
            TransportMode::Tcp => {
                let config = TcpConfig {
                    recv_timeout: self.settings.recv_timeout,
                    recv_buffer_size: self.settings.recv_buffer_size,
                    ..TcpConfig::default()
                };
                Box::new(TcpTransport::connect(&self.endpoint, config).await?)
            }
        };
        info!(%mode, host = %self.endpoint.host, "stream channel connected");
        self.stream = Some(StreamClient::new(
            session,
            D::default(),
            self.settings.skip_frames,
        ));
        Ok(())
    }

    /// The typed command surface. Fails until `connect_command` has run.
    pub fn command(&mut self) -> Result<&mut CommandClient> {
        self.command.as_mut().ok_or(ClientError::NotConnected)
    }

    /// Acquire one frame through the stream channel.
    pub async fn grab(&mut self) -> Result<GrabOutcome> {
        let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;
        Ok(stream.grab().await)
    }

    /// Grabs attempted on the current stream session.
    pub fn frame_count(&self) -> u64 {
        self.stream.as_ref().map(|s| s.frame_count()).unwrap_or(0)
    }

    pub async fn disconnect_command(&mut self) -> Result<()> {
        let client = self.command.take().ok_or(ClientError::NotConnected)?;
        client.close().await
    }

    pub async fn disconnect_stream(&mut self) -> Result<()> {
        let stream = self.stream.take().ok_or(ClientError::NotConnected)?;
        stream.close().await?;
        Ok(())
    }
}

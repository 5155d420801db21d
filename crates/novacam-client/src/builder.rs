//! Camera builder.

use std::time::Duration;

use novacam_core::wire::RECV_BUFFER_SIZE;
use novacam_core::{Endpoint, COMMAND_PORT, STREAM_PORT};

use crate::camera::Camera;
use crate::decode::{FrameDecoder, JpegDecoder};

#[derive(Debug, Clone)]
pub(crate) struct CameraSettings {
    pub recv_timeout: Duration,
    pub recv_buffer_size: usize,
    pub local_stream_port: Option<u16>,
    pub skip_frames: u32,
}

/// Builder for [`Camera`].
pub struct CameraBuilder {
    host: String,
    command_port: u16,
    stream_port: u16,
    settings: CameraSettings,
}

impl CameraBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            command_port: COMMAND_PORT,
            stream_port: STREAM_PORT,
            settings: CameraSettings {
                recv_timeout: Duration::from_secs(1),
                recv_buffer_size: RECV_BUFFER_SIZE,
                local_stream_port: None,
                skip_frames: 0,
            },
        }
    }

    pub fn command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    pub fn stream_port(mut self, port: u16) -> Self {
        self.stream_port = port;
        self
    }

    /// Local port for the UDP stream socket. Defaults to the stream port,
    /// which is what the camera expects; override when several cameras
    /// stream to the same host.
    pub fn local_stream_port(mut self, port: u16) -> Self {
        self.settings.local_stream_port = Some(port);
        self
    }

    /// Receive deadline applied to both channels.
    pub fn recv_timeout(mut self, timeout: Duration) -> Self {
        self.settings.recv_timeout = timeout;
        self
    }

    /// Socket receive buffer (SO_RCVBUF) requested for both channels.
    pub fn recv_buffer_size(mut self, bytes: usize) -> Self {
        self.settings.recv_buffer_size = bytes;
        self
    }

    /// Decode every (N+1)-th frame, discarding the rest undecoded; 0
    /// decodes every frame.
    pub fn skip_frames(mut self, skip: u32) -> Self {
        self.settings.skip_frames = skip;
        self
    }

    pub fn build(self) -> Camera<JpegDecoder> {
        self.build_with_decoder()
    }

    /// Build with a custom decoder type.
    pub fn build_with_decoder<D: FrameDecoder + Default>(self) -> Camera<D> {
        let mut endpoint = Endpoint::new(self.host);
        endpoint.command_port = self.command_port;
        endpoint.stream_port = self.stream_port;
        Camera::from_parts(endpoint, self.settings)
    }
}

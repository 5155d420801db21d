//! Novacam Client
//!
//! High-level async client for Nova network cameras: frame acquisition over
//! UDP or TCP, the decode/skip cadence, and the typed configuration command
//! set.
//!
//! # Example
//!
//! ```ignore
//! use novacam_client::{Camera, GrabOutcome};
//! use novacam_core::TransportMode;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut camera = Camera::builder("192.168.0.90").build();
//!     camera.connect_command().await?;
//!     camera.connect_stream(TransportMode::Udp).await?;
//!
//!     println!("firmware: {}", camera.command()?.firmware_version().await?);
//!
//!     loop {
//!         if let GrabOutcome::Image(image) = camera.grab().await? {
//!             println!("{}x{}", image.width(), image.height());
//!         }
//!     }
//! }
//! ```

pub mod assembler;
pub mod builder;
pub mod camera;
pub mod command;
pub mod decode;
pub mod error;
pub mod stream;

#[cfg(test)]
pub(crate) mod testkit;

pub use assembler::acquire_frame;
pub use builder::CameraBuilder;
pub use camera::Camera;
pub use command::CommandClient;
pub use decode::{DecodeError, FrameDecoder, JpegDecoder};
pub use error::{AcquireError, ClientError, Result};
pub use stream::{GrabOutcome, StreamClient};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::error::{AcquireError, ClientError, Result};
    pub use crate::stream::GrabOutcome;
    pub use novacam_core::{Endpoint, TransportMode};
}

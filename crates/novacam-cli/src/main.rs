//! novacam - command-line frame grabber for Nova network cameras.
//!
//! Connects both camera channels, applies a baseline exposure setup, then
//! pulls frames in a loop until interrupted or the requested count is
//! reached.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use image::GenericImageView;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use novacam_client::{Camera, GrabOutcome};
use novacam_core::TransportMode;

/// Pull-based frame grabber for Nova network cameras.
#[derive(Parser)]
#[command(name = "novacam")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Camera IP address or hostname
    host: String,

    /// Stream transport
    #[arg(short, long, value_enum, default_value_t = Transport::Udp)]
    transport: Transport,

    /// Number of frames to grab (0 = run until interrupted)
    #[arg(short = 'n', long, default_value_t = 0)]
    frames: u64,

    /// Decode every (N+1)-th frame, discarding the rest undecoded
    #[arg(long, default_value_t = 0)]
    skip: u32,

    /// Receive deadline in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Skip the baseline exposure/trigger setup on the command channel
    #[arg(long)]
    no_setup: bool,

    /// Directory to save decoded frames into (PNG)
    #[arg(short, long)]
    save_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Udp,
    Tcp,
}

impl From<Transport> for TransportMode {
    fn from(transport: Transport) -> Self {
        match transport {
            Transport::Udp => TransportMode::Udp,
            Transport::Tcp => TransportMode::Tcp,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut camera = Camera::builder(&cli.host)
        .recv_timeout(Duration::from_millis(cli.timeout_ms))
        .skip_frames(cli.skip)
        .build();

    info!(host = %cli.host, "connecting");
    camera
        .connect_stream(cli.transport.into())
        .await
        .context("stream channel")?;
    camera.connect_command().await.context("command channel")?;

    let command = camera.command()?;
    info!("firmware version: {}", command.firmware_version().await?);
    info!("system info: {}", command.system_info().await?);
    info!("serial number: {}", command.serial_number().await?);

    if !cli.no_setup {
        // Auto exposure between 1 and 10 ms, manual gain, free-run trigger,
        // flash output 1 active-low.
        command.set_alc(true, false, 10, 1000, 10_000, 0, 10).await?;
        command.set_exposure(10_000).await?;
        command.set_total_gain(2.0).await?;
        command.set_trigger_mode(0, false, 0, 0).await?;
        command.set_flash(1, false).await?;
    }

    if let Some(dir) = &cli.save_dir {
        std::fs::create_dir_all(dir).context("create save dir")?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    info!("grabbing frames");
    let mut grabbed = 0u64;
    while !stop.load(Ordering::Relaxed) {
        match camera.grab().await? {
            GrabOutcome::Image(image) => {
                let (width, height) = image.dimensions();
                info!("frame {}: {width}x{height}", camera.frame_count());
                if let Some(dir) = &cli.save_dir {
                    let path = dir.join(format!("frame-{:06}.png", camera.frame_count()));
                    if let Err(err) = image.save(&path) {
                        warn!("save failed: {err}");
                    }
                }
            }
            GrabOutcome::Skipped { len } => {
                info!("frame {}: skipped ({len} bytes)", camera.frame_count());
            }
            GrabOutcome::NoFrame(err) => {
                warn!("frame {}: no frame: {err}", camera.frame_count());
            }
            GrabOutcome::DecodeFailed(err) => {
                warn!("frame {}: {err}", camera.frame_count());
            }
        }

        grabbed += 1;
        if cli.frames != 0 && grabbed >= cli.frames {
            break;
        }
    }

    info!("disconnecting");
    camera.disconnect_command().await?;
    camera.disconnect_stream().await?;
    Ok(())
}

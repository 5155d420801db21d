//! Typed camera configuration commands.
//!
//! Thin string formatting over the command channel's line transactions. The
//! verb set mirrors the camera firmware's console grammar; well-formed
//! responses echo a 3-character status prefix, which the getters strip
//! before handing the remainder back.

use novacam_transport::CommandChannel;

use crate::error::Result;

/// Length of the status/echo prefix on well-formed responses.
const RESPONSE_PREFIX_LEN: usize = 3;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

fn polarity(active_high: bool) -> &'static str {
    if active_high {
        "H"
    } else {
        "L"
    }
}

/// Request/response client for the camera's configuration channel.
///
/// Transactions are strictly sequential; the stream channel runs on its own
/// socket and is unaffected by anything issued here.
pub struct CommandClient {
    channel: CommandChannel,
}

impl CommandClient {
    pub fn new(channel: CommandChannel) -> Self {
        Self { channel }
    }

    /// Raw transaction escape hatch for verbs not covered below.
    pub async fn send(&mut self, line: &str) -> Result<String> {
        Ok(self.channel.transact(line).await?)
    }

    async fn query(&mut self, line: &str) -> Result<String> {
        let response = self.send(line).await?;
        Ok(response
            .get(RESPONSE_PREFIX_LEN..)
            .unwrap_or_default()
            .to_string())
    }

    pub async fn firmware_version(&mut self) -> Result<String> {
        self.query("GetFirmwareVersion").await
    }

    pub async fn system_info(&mut self) -> Result<String> {
        self.query("GetSystemInfo").await
    }

    pub async fn serial_number(&mut self) -> Result<String> {
        self.query("GetSerialNumber").await
    }

    /// Manual exposure time in microseconds.
    pub async fn set_exposure(&mut self, microseconds: u32) -> Result<()> {
        self.send(&format!("SetExposure {microseconds}")).await.map(drop)
    }

    /// Combined analog/digital gain as a linear factor (2.0 ≈ 6 dB).
    pub async fn set_total_gain(&mut self, gain: f32) -> Result<()> {
        self.send(&format!("SetTotalGain {gain}")).await.map(drop)
    }

    /// Auto luminance control. `auto_exposure`/`auto_gain` switch AEC/AGC;
    /// the exposure range is in microseconds.
    #[allow(clippy::too_many_arguments)]
    pub async fn set_alc(
        &mut self,
        auto_exposure: bool,
        auto_gain: bool,
        target: u32,
        min_exposure: u32,
        max_exposure: u32,
        min_gain: u32,
        max_gain: u32,
    ) -> Result<()> {
        self.send(&format!(
            "SetALC {} {} {target} {min_exposure} {max_exposure} {min_gain} {max_gain}",
            on_off(auto_exposure),
            on_off(auto_gain),
        ))
        .await
        .map(drop)
    }

    /// Mode 0 is free-run; widths are minimum trigger pulse widths.
    pub async fn set_trigger_mode(
        &mut self,
        mode: u32,
        active_high: bool,
        min_active_width: u32,
        min_inactive_width: u32,
    ) -> Result<()> {
        self.send(&format!(
            "SetTriggerMode {mode} {} {min_active_width} {min_inactive_width}",
            polarity(active_high)
        ))
        .await
        .map(drop)
    }

    pub async fn set_flash(&mut self, mode: u32, active_high: bool) -> Result<()> {
        self.send(&format!("SetFlash {mode} {}", polarity(active_high)))
            .await
            .map(drop)
    }

    pub async fn set_output_port(&mut self, port: u32, kind: u32) -> Result<()> {
        self.send(&format!("SetOutputPort {port} {kind}")).await.map(drop)
    }

    pub async fn set_flash_on_delay(&mut self, delay: u32) -> Result<()> {
        self.send(&format!("SetFlashOnDelay {delay}")).await.map(drop)
    }

    pub async fn set_flash_off_delay(&mut self, delay: u32) -> Result<()> {
        self.send(&format!("SetFlashOffDelay {delay}")).await.map(drop)
    }

    pub async fn set_monochrome(&mut self, mode: u32) -> Result<()> {
        self.send(&format!("SetMonochrome {mode}")).await.map(drop)
    }

    /// Auto white balance mode.
    pub async fn set_awb(&mut self, mode: u32) -> Result<()> {
        self.send(&format!("SetAWB {mode}")).await.map(drop)
    }

    /// Frames captured per trigger event.
    pub async fn set_trigger_image_count(&mut self, count: u32) -> Result<()> {
        self.send(&format!("SetTrigImgNum {count}")).await.map(drop)
    }

    pub async fn set_forced_trigger(&mut self) -> Result<()> {
        self.send("SetForcedTrigger ON").await.map(drop)
    }

    /// `Some(count)` enables bracketing over that many channels.
    pub async fn set_bracket_mode(&mut self, channels: Option<u32>) -> Result<()> {
        let line = match channels {
            Some(count) => format!("SetBracketMode ON {count}"),
            None => "SetBracketMode OFF".to_string(),
        };
        self.send(&line).await.map(drop)
    }

    pub async fn set_bracket_info(
        &mut self,
        channel: u32,
        exposure: u32,
        analog_gain: f32,
        digital_gain: f32,
    ) -> Result<()> {
        self.send(&format!(
            "SetBracketInfo {channel} {exposure} {analog_gain} {digital_gain}"
        ))
        .await
        .map(drop)
    }

    pub async fn set_jpeg_quality(&mut self, quality: u32) -> Result<()> {
        self.send(&format!("SetJPEGQuality {quality}")).await.map(drop)
    }

    /// `Some(bitrate)` enables constant-bitrate JPEG at that rate.
    pub async fn set_jpeg_cbr(&mut self, bitrate: Option<u32>) -> Result<()> {
        let line = match bitrate {
            Some(bitrate) => format!("SetJPEGCBR ON {bitrate}"),
            None => "SetJPEGCBR OFF".to_string(),
        };
        self.send(&line).await.map(drop)
    }

    pub async fn set_h264_quality(&mut self, quality: u32) -> Result<()> {
        self.send(&format!("SetH264Quality {quality}")).await.map(drop)
    }

    pub async fn set_zoom_focus_position(&mut self, zoom: i32, focus: i32) -> Result<()> {
        self.send(&format!("SetZoomFocusPosition {zoom} {focus}"))
            .await
            .map(drop)
    }

    pub async fn close(self) -> Result<()> {
        Ok(self.channel.close().await?)
    }
}

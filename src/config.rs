//! System configuration parameters
//!
//! Every tunable of the rover lives here. Defaults are the values the
//! vehicle ships with; a JSON overlay supplied at build time through the
//! `ROVERCAM_CONFIG` environment variable replaces individual fields
//! without editing source (credentials, broker address, ...).
//!
//! ```text
//! ROVERCAM_CONFIG='{"wifi_ssid":"Garage","wifi_password":"hunter22"}' cargo build
//! ```

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Camera pixel format requested from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Raw RGB565, JPEG-compressed per frame before streaming.
    Rgb565,
    /// Sensor-side JPEG.
    Jpeg,
}

/// Camera frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameSize {
    /// 160x120
    Qqvga,
    /// 320x240
    Qvga,
    /// 640x480
    Vga,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Network ---
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
    /// Association poll interval while waiting for the AP (milliseconds)
    pub connect_poll_ms: u32,

    // --- Message bus ---
    pub broker_host: String<64>,
    pub broker_port: u16,
    pub client_id: String<32>,
    /// Topic carrying drive commands
    pub command_topic: String<64>,

    // --- Streaming ---
    /// Path the viewer opens on the stream server
    pub stream_path: String<32>,
    /// JPEG quality of streamed frames (1-100)
    pub jpeg_quality: u8,
    pub pixel_format: PixelFormat,
    pub frame_size: FrameSize,

    // --- Actuation ---
    /// PWM timer frequency shared by all four channels (Hz)
    pub pwm_frequency_hz: u32,
    /// Gap between the two writes of a paired drive command (milliseconds)
    pub pair_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Placeholders; real credentials come from the build-time overlay.
            wifi_ssid: fixed("****"),
            wifi_password: fixed("********"),
            connect_poll_ms: 1000,

            broker_host: fixed("192.168.1.101"),
            broker_port: 1883,
            client_id: fixed("nicla_vision"),
            command_topic: fixed("nicla/test"),

            stream_path: fixed("/"),
            jpeg_quality: 90,
            pixel_format: PixelFormat::Rgb565,
            frame_size: FrameSize::Qvga,

            pwm_frequency_hz: 250,
            pair_delay_ms: 100,
        }
    }
}

/// Build-time JSON overlay, if one was supplied.
const BUILD_OVERLAY: Option<&str> = option_env!("ROVERCAM_CONFIG");

impl SystemConfig {
    /// Defaults, overlaid with the build-time JSON (if any), validated.
    pub fn load() -> Result<Self, Error> {
        match BUILD_OVERLAY {
            Some(json) => Self::from_json(json),
            None => {
                let cfg = Self::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Parse a JSON overlay. Fields missing from `json` keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("overlay is not valid JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), Error> {
        if !(100..=10_000).contains(&self.connect_poll_ms) {
            return Err(Error::Config("connect_poll_ms must be 100-10000"));
        }
        if self.broker_host.is_empty() {
            return Err(Error::Config("broker_host must not be empty"));
        }
        if self.broker_port == 0 {
            return Err(Error::Config("broker_port must be non-zero"));
        }
        if self.client_id.is_empty() {
            return Err(Error::Config("client_id must not be empty"));
        }
        if self.command_topic.is_empty() {
            return Err(Error::Config("command_topic must not be empty"));
        }
        if !self.stream_path.starts_with('/') {
            return Err(Error::Config("stream_path must start with '/'"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Config("jpeg_quality must be 1-100"));
        }
        // Above 400 Hz the 20000-tick pulse no longer fits in one period.
        if !(50..=400).contains(&self.pwm_frequency_hz) {
            return Err(Error::Config("pwm_frequency_hz must be 50-400"));
        }
        if self.pair_delay_ms > 2000 {
            return Err(Error::Config("pair_delay_ms must be 0-2000"));
        }
        Ok(())
    }

    /// Broker URL in the form the MQTT client expects.
    pub fn broker_url(&self) -> std::string::String {
        format!("mqtt://{}:{}", self.broker_host, self.broker_port)
    }
}

fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    // Defaults are compile-time constants well under capacity.
    let _ = out.push_str(s);
    out
}

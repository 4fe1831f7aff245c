//! Unified error types for the rover firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the frame
//! loop and bring-up code handle failures uniformly. All variants are
//! `Copy`; none of them allocate.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::app::commands::DecodeError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound command payload could not be decoded.
    Command(DecodeError),
    /// The camera could not be initialised or a frame could not be captured.
    Camera(CameraError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Camera(e) => write!(f, "camera: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Camera errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// `esp_camera_init` returned a non-OK code.
    InitFailed(i32),
    /// The driver handed back no frame buffer.
    CaptureFailed,
    /// JPEG compression of a raw frame failed.
    EncodeFailed,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed(rc) => write!(f, "sensor init failed (rc={rc})"),
            Self::CaptureFailed => write!(f, "frame capture failed"),
            Self::EncodeFailed => write!(f, "JPEG encode failed"),
        }
    }
}

impl core::error::Error for CameraError {}

impl From<CameraError> for Error {
    fn from(e: CameraError) -> Self {
        Self::Camera(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// WiFi bring-up failed.
    Wifi(ConnectivityError),
    /// The MQTT client could not be created.
    MqttClient(i32),
    /// Subscribing to the command topic failed.
    MqttSubscribe(i32),
    /// The stream server could not be started or a handler registered.
    StreamServer(i32),
    /// Writing a frame to the viewer failed (viewer went away).
    StreamWrite,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi(e) => write!(f, "{e}"),
            Self::MqttClient(rc) => write!(f, "MQTT client init failed (rc={rc})"),
            Self::MqttSubscribe(rc) => write!(f, "MQTT subscribe failed (rc={rc})"),
            Self::StreamServer(rc) => write!(f, "stream server failed (rc={rc})"),
            Self::StreamWrite => write!(f, "stream write failed"),
        }
    }
}

impl core::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

impl From<ConnectivityError> for CommsError {
    fn from(e: ConnectivityError) -> Self {
        Self::Wifi(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Comms(CommsError::Wifi(e))
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

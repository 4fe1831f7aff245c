//! Inbound drive commands.
//!
//! A remote operator publishes short ASCII codes on the command topic.
//! The **last** character selects the primary command; when it is `1`,
//! the character before it picks forward, left or right:
//!
//! | Payload tail | Command     |
//! |--------------|-------------|
//! | `0`          | Stop        |
//! | `1`          | Forward     |
//! | `11`         | Left        |
//! | `21`         | Right       |
//! | `2`          | Backward    |
//! | `3` / `4`    | Wheels down / up |
//! | `5` / `6`    | Winch up / down  |
//! | `7`          | Winch stop  |
//! | `8` / `9`    | Lights on / off  |

use core::fmt;

use heapless::{String, Vec};

/// Longest topic the bus adapter will forward.
pub const MAX_TOPIC_LEN: usize = 64;
/// Longest payload the bus adapter will forward.
pub const MAX_PAYLOAD_LEN: usize = 128;

/// One notification received on the message bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy `topic`/`payload` into a fixed-capacity message.
    /// Returns `None` if either exceeds its capacity.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut t = String::new();
        t.push_str(topic).ok()?;
        let p = Vec::from_slice(payload).ok()?;
        Some(Self { topic: t, payload: p })
    }
}

/// Commands the rover understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    Stop,
    Forward,
    Left,
    Right,
    Backward,
    WheelsDown,
    WheelsUp,
    WinchUp,
    WinchDown,
    WinchStop,
    LightsOn,
    LightsOff,
}

impl DriveCommand {
    /// Upper-case name used in the command log line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::Forward => "FORWARD",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Backward => "BACKWARDS",
            Self::WheelsDown => "WHEELS DOWN",
            Self::WheelsUp => "WHEELS UP",
            Self::WinchUp => "WINCH UP",
            Self::WinchDown => "WINCH DOWN",
            Self::WinchStop => "WINCH STOP",
            Self::LightsOn => "LIGHTS ON",
            Self::LightsOff => "LIGHTS OFF",
        }
    }
}

/// Why a payload did not decode into a [`DriveCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload bytes are not valid UTF-8.
    InvalidUtf8,
    /// Payload is empty.
    Empty,
    /// The last character is not a decimal digit.
    NotADigit(char),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUtf8 => write!(f, "payload is not UTF-8"),
            Self::Empty => write!(f, "empty payload"),
            Self::NotADigit(c) => write!(f, "last character {c:?} is not a digit"),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Decode raw payload bytes.
pub fn decode(payload: &[u8]) -> Result<DriveCommand, DecodeError> {
    let text = core::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)?;
    decode_str(text)
}

/// Decode an already-validated text payload.
pub fn decode_str(text: &str) -> Result<DriveCommand, DecodeError> {
    let mut tail = text.chars().rev();
    let last = tail.next().ok_or(DecodeError::Empty)?;
    let code = last.to_digit(10).ok_or(DecodeError::NotADigit(last))?;

    let cmd = match code {
        0 => DriveCommand::Stop,
        // Only `1` looks at the modifier; a missing or unrecognised one
        // means plain forward.
        1 => match tail.next().and_then(|c| c.to_digit(10)) {
            Some(1) => DriveCommand::Left,
            Some(2) => DriveCommand::Right,
            _ => DriveCommand::Forward,
        },
        2 => DriveCommand::Backward,
        3 => DriveCommand::WheelsDown,
        4 => DriveCommand::WheelsUp,
        5 => DriveCommand::WinchUp,
        6 => DriveCommand::WinchDown,
        7 => DriveCommand::WinchStop,
        8 => DriveCommand::LightsOn,
        _ => DriveCommand::LightsOff,
    };
    Ok(cmd)
}

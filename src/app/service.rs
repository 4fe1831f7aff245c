//! Application service: the hexagonal core.
//!
//! [`RoverService`] turns bus notifications into actuator writes. It keeps
//! the most recently received command text and nothing else; every
//! decision is a fixed lookup (see [`actuation`](super::actuation)).
//!
//! ```text
//!  InboundMessage ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                     │     RoverService      │
//!   ActuatorPort ◀────│  decode · plan · run  │──▶ DelayNs
//!                     └──────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::info;

use crate::config::SystemConfig;

use super::actuation::execute;
use super::commands::{DecodeError, DriveCommand, InboundMessage, MAX_PAYLOAD_LEN, decode_str};
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};

// ───────────────────────────────────────────────────────────────
// RoverService
// ───────────────────────────────────────────────────────────────

pub struct RoverService {
    pair_delay_ms: u32,
    last_command: String<MAX_PAYLOAD_LEN>,
    applied: u32,
    rejected: u32,
}

impl RoverService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            pair_delay_ms: config.pair_delay_ms,
            last_command: String::new(),
            applied: 0,
            rejected: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Park every output: all pulse widths 0, lights low.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!("RoverService started, actuators parked");
    }

    // ── Command handling ──────────────────────────────────────

    /// Decode one bus notification and apply it.
    ///
    /// Malformed payloads are reported through `sink` and returned as
    /// errors; they never touch `hw`.
    pub fn handle_message(
        &mut self,
        msg: &InboundMessage,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<DriveCommand, DecodeError> {
        let Ok(text) = core::str::from_utf8(&msg.payload) else {
            return Err(self.reject(DecodeError::InvalidUtf8, sink));
        };

        self.last_command.clear();
        // Same capacity as the payload buffer, cannot overflow.
        let _ = self.last_command.push_str(text);
        sink.emit(&AppEvent::MessageReceived {
            topic: msg.topic.as_str(),
            text,
        });

        let cmd = match decode_str(text) {
            Ok(cmd) => cmd,
            Err(e) => return Err(self.reject(e, sink)),
        };

        execute(&cmd.plan(), hw, delay, self.pair_delay_ms);
        self.applied = self.applied.wrapping_add(1);
        sink.emit(&AppEvent::CommandApplied(cmd));
        Ok(cmd)
    }

    fn reject(&mut self, e: DecodeError, sink: &mut impl EventSink) -> DecodeError {
        self.rejected = self.rejected.wrapping_add(1);
        sink.emit(&AppEvent::CommandRejected(e));
        e
    }

    // ── Queries ───────────────────────────────────────────────

    /// Text of the most recently received UTF-8 payload.
    pub fn last_command(&self) -> &str {
        self.last_command.as_str()
    }

    pub fn applied_count(&self) -> u32 {
        self.applied
    }

    pub fn rejected_count(&self) -> u32 {
        self.rejected
    }
}

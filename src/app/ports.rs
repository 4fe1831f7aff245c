//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoverService / StreamLoop (domain)
//! ```
//!
//! Driven adapters (PWM, camera, message bus, clock, event sinks)
//! implement these traits. The domain core consumes them via generics and
//! never touches hardware directly. Delays use
//! [`embedded_hal::delay::DelayNs`].

use crate::error::{CameraError, Error};

use super::actuation::{PulseWidth, PwmChannel};
use super::commands::InboundMessage;
use super::events::{AppEvent, SessionEvent};

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Set a channel's pulse width (timer ticks, 0 = output low).
    fn set_pulse_width(&mut self, channel: PwmChannel, width: PulseWidth);

    /// Drive the lights pin high (`true`) or low.
    fn set_lights(&mut self, on: bool);

    /// Every PWM channel to 0 and lights off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Command source (driving adapter: message bus → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking source of remote commands.
pub trait CommandSource {
    /// Take at most one pending message, if any. Never blocks.
    fn check_msg(&mut self) -> Option<InboundMessage>;
}

// ───────────────────────────────────────────────────────────────
// Camera port
// ───────────────────────────────────────────────────────────────

/// Frame producer. Frames are JPEG-encoded bytes ready for streaming.
pub trait CameraPort {
    type Frame: AsRef<[u8]>;

    fn capture(&mut self) -> Result<Self::Frame, CameraError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock.
pub trait TimePort {
    /// Microseconds since boot.
    fn uptime_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent<'_>);
}

// ───────────────────────────────────────────────────────────────
// Streaming
// ───────────────────────────────────────────────────────────────

/// Callbacks a [`StreamServer`] drives: session lifecycle notifications
/// plus one call per frame the viewer needs.
pub trait FrameHandler {
    type Frame: AsRef<[u8]>;

    fn on_session(&mut self, event: &SessionEvent<'_>);

    /// Produce the next frame for `session`. An error ends the session.
    fn next_frame(&mut self, path: &str, session: u32) -> Result<Self::Frame, Error>;
}

/// Streaming-media server. `stream` takes over the calling thread and
/// does not return while the server is healthy.
pub trait StreamServer {
    fn stream<H>(&mut self, handler: H) -> Result<(), Error>
    where
        H: FrameHandler + Send + 'static;
}

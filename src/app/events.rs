//! Outbound application events.
//!
//! The [`RoverService`](super::service::RoverService) and
//! [`StreamLoop`](super::stream::StreamLoop) emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them (serial log today).

use super::commands::{DecodeError, DriveCommand};
use crate::error::Error;

/// Streaming session lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Setup,
    Play,
    Pause,
    Teardown,
}

/// Lifecycle notification for one viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEvent<'a> {
    pub kind: SessionKind,
    pub path: &'a str,
    pub session: u32,
}

impl<'a> SessionEvent<'a> {
    pub fn new(kind: SessionKind, path: &'a str, session: u32) -> Self {
        Self { kind, path, session }
    }
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent<'a> {
    /// Actuators zeroed, service ready.
    Started,

    /// A notification arrived on the bus (payload as text).
    MessageReceived { topic: &'a str, text: &'a str },

    /// A command was decoded and its actuation plan applied.
    CommandApplied(DriveCommand),

    /// A payload did not decode; nothing was written.
    CommandRejected(DecodeError),

    /// Viewer session lifecycle. `fps` is reported on teardown.
    Session { event: SessionEvent<'a>, fps: Option<f32> },

    /// Frame production failed; the session ends.
    FrameFailed(Error),
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production, stderr on the host).

use log::{error, info, warn};

use crate::app::commands::DecodeError;
use crate::app::events::{AppEvent, SessionKind};
use crate::app::ports::EventSink;

/// Install the host console backend at `Info`. Errors if a logger is
/// already set.
#[cfg(not(target_os = "espidf"))]
pub fn init_host_logger() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
}

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent<'_>) {
        match event {
            AppEvent::Started => {
                info!("START | actuators parked");
            }
            AppEvent::MessageReceived { topic, text } => {
                info!("{} {}", topic, text);
            }
            AppEvent::CommandApplied(cmd) => {
                info!("Received command - {}", cmd.name());
            }
            AppEvent::CommandRejected(DecodeError::NotADigit(_)) => {
                warn!("Unknown Command!!!!!");
            }
            AppEvent::CommandRejected(e) => {
                error!("ERROR: {}", e);
            }
            AppEvent::Session { event, fps } => {
                let verb = match event.kind {
                    SessionKind::Setup => "Opening",
                    SessionKind::Play => "Playing",
                    SessionKind::Pause => "Pausing",
                    SessionKind::Teardown => "Closing",
                };
                match fps {
                    Some(fps) => info!(
                        "{} \"{}\" in session {} ({:.1} fps)",
                        verb, event.path, event.session, fps
                    ),
                    None => info!("{} \"{}\" in session {}", verb, event.path, event.session),
                }
            }
            AppEvent::FrameFailed(e) => {
                error!("FRAME | {}", e);
            }
        }
    }
}

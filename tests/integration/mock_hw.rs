//! Mock adapters for integration tests.
//!
//! [`MockHardware`] and [`MockDelay`] append to one shared [`CallLog`], so
//! tests can assert on the interleaving of actuator writes and pauses.
//! Everything is `Send` so the mocks can be handed to a stream server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use rovercam::app::actuation::{PulseWidth, PwmChannel};
use rovercam::app::commands::InboundMessage;
use rovercam::app::events::{AppEvent, SessionKind};
use rovercam::app::ports::{ActuatorPort, CommandSource, EventSink, TimePort};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Pulse(PwmChannel, PulseWidth),
    Lights(bool),
    AllOff,
    /// Blocking delay, in whole milliseconds.
    Delay(u32),
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Calls that touched an actuator (delays excluded).
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Delay(_)))
            .collect()
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    log: CallLog,
}

impl MockHardware {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl ActuatorPort for MockHardware {
    fn set_pulse_width(&mut self, channel: PwmChannel, width: PulseWidth) {
        self.log.push(Call::Pulse(channel, width));
    }

    fn set_lights(&mut self, on: bool) {
        self.log.push(Call::Lights(on));
    }

    fn all_off(&mut self) {
        self.log.push(Call::AllOff);
    }
}

// ── MockDelay ─────────────────────────────────────────────────

pub struct MockDelay {
    log: CallLog,
}

impl MockDelay {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Call::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Call::Delay(ms));
    }
}

// ── ScriptedBus ───────────────────────────────────────────────

/// Command source fed from a fixed script of payloads.
pub struct ScriptedBus {
    pending: VecDeque<InboundMessage>,
}

impl ScriptedBus {
    pub fn new(payloads: &[&[u8]]) -> Self {
        Self {
            pending: payloads
                .iter()
                .map(|p| InboundMessage::new("nicla/test", p).unwrap())
                .collect(),
        }
    }

    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl CommandSource for ScriptedBus {
    fn check_msg(&mut self) -> Option<InboundMessage> {
        self.pending.pop_front()
    }
}

// ── StepClock ─────────────────────────────────────────────────

/// Advances a fixed step on every read.
pub struct StepClock {
    now_us: AtomicU64,
    step_us: u64,
}

impl StepClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now_us: AtomicU64::new(0),
            step_us,
        }
    }
}

impl TimePort for StepClock {
    fn uptime_us(&self) -> u64 {
        self.now_us.fetch_add(self.step_us, Ordering::Relaxed)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Owned copy of the events tests care about.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Started,
    Received(String),
    Applied(&'static str),
    Rejected,
    Session(SessionKind, u32, Option<f32>),
    FrameFailed,
}

#[derive(Clone, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<Seen>>>);

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }

    pub fn sessions(&self) -> Vec<(SessionKind, u32)> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Session(kind, id, _) => Some((kind, id)),
                _ => None,
            })
            .collect()
    }

    pub fn applied(&self) -> Vec<&'static str> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Applied(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent<'_>) {
        let seen = match event {
            AppEvent::Started => Seen::Started,
            AppEvent::MessageReceived { text, .. } => Seen::Received((*text).to_owned()),
            AppEvent::CommandApplied(cmd) => Seen::Applied(cmd.name()),
            AppEvent::CommandRejected(_) => Seen::Rejected,
            AppEvent::Session { event, fps } => Seen::Session(event.kind, event.session, *fps),
            AppEvent::FrameFailed(_) => Seen::FrameFailed,
        };
        self.0.lock().unwrap().push(seen);
    }
}

//! Per-frame control loop.
//!
//! [`StreamLoop`] is the [`FrameHandler`] handed to the stream server.
//! The server calls [`next_frame`](FrameHandler::next_frame) each time a
//! viewer needs an image; that is the only place commands are serviced:
//!
//! ```text
//!  capture ──▶ clock.tick ──▶ bus.check_msg (≤ 1) ──▶ service ──▶ frame out
//! ```
//!
//! Everything runs on the server's thread, so hardware writes never race.

use embedded_hal::delay::DelayNs;

use crate::error::Error;

use super::clock::FrameClock;
use super::events::{AppEvent, SessionEvent, SessionKind};
use super::ports::{ActuatorPort, CameraPort, CommandSource, EventSink, FrameHandler, TimePort};
use super::service::RoverService;

pub struct StreamLoop<Cam, Bus, Hw, D, Sink, T> {
    service: RoverService,
    camera: Cam,
    bus: Bus,
    hw: Hw,
    delay: D,
    sink: Sink,
    time: T,
    clock: FrameClock,
}

impl<Cam, Bus, Hw, D, Sink, T> StreamLoop<Cam, Bus, Hw, D, Sink, T>
where
    Cam: CameraPort,
    Bus: CommandSource,
    Hw: ActuatorPort,
    D: DelayNs,
    Sink: EventSink,
    T: TimePort,
{
    pub fn new(
        service: RoverService,
        camera: Cam,
        bus: Bus,
        hw: Hw,
        delay: D,
        sink: Sink,
        time: T,
    ) -> Self {
        Self {
            service,
            camera,
            bus,
            hw,
            delay,
            sink,
            time,
            clock: FrameClock::new(),
        }
    }

    pub fn service(&self) -> &RoverService {
        &self.service
    }

    pub fn hardware(&self) -> &Hw {
        &self.hw
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Service at most one pending bus message.
    fn poll_commands(&mut self) {
        if let Some(msg) = self.bus.check_msg() {
            // Rejections are already reported through the sink.
            let _ = self
                .service
                .handle_message(&msg, &mut self.hw, &mut self.delay, &mut self.sink);
        }
    }
}

impl<Cam, Bus, Hw, D, Sink, T> FrameHandler for StreamLoop<Cam, Bus, Hw, D, Sink, T>
where
    Cam: CameraPort,
    Bus: CommandSource,
    Hw: ActuatorPort,
    D: DelayNs,
    Sink: EventSink,
    T: TimePort,
{
    type Frame = Cam::Frame;

    fn on_session(&mut self, event: &SessionEvent<'_>) {
        let fps = match event.kind {
            SessionKind::Play => {
                self.clock.reset();
                self.clock.tick(self.time.uptime_us());
                None
            }
            SessionKind::Teardown => Some(self.clock.fps()),
            SessionKind::Setup | SessionKind::Pause => None,
        };
        self.sink.emit(&AppEvent::Session { event: *event, fps });
    }

    fn next_frame(&mut self, _path: &str, _session: u32) -> Result<Self::Frame, Error> {
        let frame = match self.camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                let e = Error::from(e);
                self.sink.emit(&AppEvent::FrameFailed(e));
                return Err(e);
            }
        };
        self.clock.tick(self.time.uptime_us());
        self.poll_commands();
        Ok(frame)
    }
}

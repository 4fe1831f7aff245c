//! Stream server adapter: implements [`StreamServer`].
//!
//! Frames are served as MJPEG (`multipart/x-mixed-replace`) on one path.
//! Each viewer connection is one session:
//!
//! ```text
//! connect ──▶ Setup ──▶ Play ──▶ next_frame … ──▶ Teardown
//!                                  (write error or frame error)
//! ```
//!
//! Viewers pause locally, so `Pause` is never raised.

use heapless::String;

use crate::app::events::{SessionEvent, SessionKind};
use crate::app::ports::{FrameHandler, StreamServer};
use crate::error::Error;

pub const BOUNDARY: &str = "123456789000000000000987654321";
pub const CONTENT_TYPE: &str =
    "multipart/x-mixed-replace; boundary=123456789000000000000987654321";

/// Multipart header preceding one JPEG of `len` bytes.
pub fn part_header(len: usize) -> std::string::String {
    format!("\r\n--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {len}\r\n\r\n")
}

/// Drive one viewer session against `handler`, writing every part through
/// `write`. Returns the number of frames delivered.
fn run_session<H, W>(handler: &mut H, path: &str, session: u32, mut write: W) -> u32
where
    H: FrameHandler,
    W: FnMut(&[u8]) -> bool,
{
    handler.on_session(&SessionEvent::new(SessionKind::Setup, path, session));
    handler.on_session(&SessionEvent::new(SessionKind::Play, path, session));

    let mut delivered = 0u32;
    while let Ok(frame) = handler.next_frame(path, session) {
        let frame = frame.as_ref();
        if !write(part_header(frame.len()).as_bytes()) || !write(frame) {
            break;
        }
        delivered += 1;
    }

    handler.on_session(&SessionEvent::new(SessionKind::Teardown, path, session));
    delivered
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF HTTP server
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use device::MjpegServer;

#[cfg(target_os = "espidf")]
mod device {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use heapless::String;
    use log::info;

    use super::{CONTENT_TYPE, run_session};
    use crate::app::ports::{FrameHandler, StreamServer};
    use crate::error::{CommsError, Error};

    pub struct MjpegServer {
        path: String<32>,
        server: Option<EspHttpServer<'static>>,
    }

    impl MjpegServer {
        pub fn new(path: &str) -> Self {
            let mut p = String::new();
            let _ = p.push_str(path);
            Self { path: p, server: None }
        }
    }

    impl StreamServer for MjpegServer {
        fn stream<H>(&mut self, handler: H) -> Result<(), Error>
        where
            H: FrameHandler + Send + 'static,
        {
            let mut server = EspHttpServer::new(&Configuration::default())
                .map_err(|e| CommsError::StreamServer(e.code()))?;

            let handler = Arc::new(Mutex::new(handler));
            let sessions = AtomicU32::new(1);
            let path = self.path.clone();

            server
                .fn_handler(self.path.as_str(), Method::Get, move |request| {
                    let session = sessions.fetch_add(1, Ordering::Relaxed);
                    let mut response =
                        request.into_response(200, Some("OK"), &[("Content-Type", CONTENT_TYPE)])?;
                    // One viewer at a time drives the frame loop.
                    let mut handler = handler
                        .lock()
                        .map_err(|_| anyhow::anyhow!("frame handler poisoned"))?;
                    let frames = run_session(&mut *handler, path.as_str(), session, |bytes| {
                        response.write_all(bytes).is_ok()
                    });
                    info!("Stream: session {} ended after {} frames", session, frames);
                    Ok::<(), anyhow::Error>(())
                })
                .map_err(|e| CommsError::StreamServer(e.code()))?;

            info!("Stream: serving MJPEG on \"{}\"", self.path);
            self.server = Some(server);

            // Frames are produced on the httpd task; this thread only parks.
            loop {
                FreeRtos::delay_ms(1000);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

/// What one simulated viewer received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub session: u32,
    pub frames: u32,
    pub bytes: usize,
}

/// Host stand-in: runs `sessions` back-to-back viewers, each of which
/// disconnects after `frames_per_session` frames (or earlier on a frame
/// error), then returns.
pub struct SimStreamServer {
    path: String<32>,
    sessions: u32,
    frames_per_session: u32,
    reports: std::vec::Vec<SessionReport>,
}

impl SimStreamServer {
    pub fn new(path: &str, sessions: u32, frames_per_session: u32) -> Self {
        let mut p = String::new();
        let _ = p.push_str(path);
        Self {
            path: p,
            sessions,
            frames_per_session,
            reports: std::vec::Vec::new(),
        }
    }

    pub fn reports(&self) -> &[SessionReport] {
        &self.reports
    }
}

impl StreamServer for SimStreamServer {
    fn stream<H>(&mut self, mut handler: H) -> Result<(), Error>
    where
        H: FrameHandler + Send + 'static,
    {
        for session in 1..=self.sessions {
            let mut budget = self.frames_per_session;
            let mut bytes = 0usize;
            let mut in_part = false;
            let frames = run_session(&mut handler, self.path.as_str(), session, |chunk| {
                // Header and body alternate; the viewer hangs up before
                // the header of the frame past its budget.
                if !in_part {
                    if budget == 0 {
                        return false;
                    }
                    budget -= 1;
                }
                in_part = !in_part;
                bytes += chunk.len();
                true
            });
            self.reports.push(SessionReport {
                session,
                frames,
                bytes,
            });
        }
        Ok(())
    }
}

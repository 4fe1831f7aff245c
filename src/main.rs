//! RoverCam Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by the stream server's frame loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   EspCamera     Esp32Time      │
//! │  (ActuatorPort)    (EventSink)    (CameraPort)  (TimePort)     │
//! │  WifiAdapter       MqttBus        MjpegServer                  │
//! │  (Connectivity)    (CommandSource)(StreamServer)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   StreamLoop ─▶ RoverService (decode · plan · run)     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bring-up order: PWM + lights parked, camera, WiFi, MQTT, stream. Any
//! bring-up failure is fatal.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use rovercam::adapters::hardware::HardwareAdapter;
use rovercam::adapters::log_sink::LogEventSink;
use rovercam::adapters::mqtt::{INBOUND, MqttBus};
use rovercam::adapters::time::{Esp32TimeAdapter, SystemDelay};
use rovercam::adapters::wifi::{ConnectivityPort, WifiAdapter, associate};
use rovercam::app::ports::StreamServer;
use rovercam::app::service::RoverService;
use rovercam::app::stream::StreamLoop;
use rovercam::config::SystemConfig;
use rovercam::drivers::hw_init;

fn banner() {
    info!("╔══════════════════════════════════════╗");
    info!("║  RoverCam v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
}

/// Park the actuators and build the domain service.
fn bring_up_actuators(
    config: &SystemConfig,
    sink: &mut LogEventSink,
) -> Result<(RoverService, HardwareAdapter)> {
    hw_init::init_peripherals(config.pwm_frequency_hz)?;
    let mut hw = HardwareAdapter::new(config.pwm_frequency_hz);
    let mut service = RoverService::new(config);
    service.start(&mut hw, sink);
    Ok((service, hw))
}

// ── Device ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use rovercam::adapters::camera::EspCamera;
    use rovercam::adapters::stream_server::MjpegServer;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    let config = SystemConfig::load()?;

    // ── 2. Actuators parked ───────────────────────────────────
    let mut sink = LogEventSink::new();
    let (service, hw) = bring_up_actuators(&config, &mut sink)?;

    // ── 3. Camera ─────────────────────────────────────────────
    let camera = EspCamera::init(&config)?;

    // ── 4. WiFi (blocks until the link is up) ─────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs)?;
    wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str())?;
    associate(&mut wifi, &mut SystemDelay, config.connect_poll_ms)?;

    // ── 5. MQTT command bus ───────────────────────────────────
    let bus = MqttBus::connect(&config, &INBOUND)?;

    // ── 6. Stream: the frame loop runs inside the server ──────
    let frame_loop = StreamLoop::new(
        service,
        camera,
        bus,
        hw,
        SystemDelay,
        sink,
        Esp32TimeAdapter::new(),
    );
    let mut server = MjpegServer::new(config.stream_path.as_str());
    server.stream(frame_loop)?;

    // `wifi` must outlive the stream.
    drop(wifi);
    Ok(())
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use rovercam::adapters::camera::SimCamera;
    use rovercam::adapters::mqtt::enqueue;
    use rovercam::adapters::stream_server::SimStreamServer;

    rovercam::adapters::log_sink::init_host_logger()?;
    banner();

    let config = SystemConfig::load()?;

    let mut sink = LogEventSink::new();
    let (service, hw) = bring_up_actuators(&config, &mut sink)?;

    let mut wifi = WifiAdapter::new(2);
    wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str())?;
    associate(&mut wifi, &mut SystemDelay, config.connect_poll_ms)?;

    // A scripted operator session; "x" is rejected.
    let topic = config.command_topic.as_str();
    for payload in ["8", "4", "1", "11", "21", "2", "0", "6", "7", "x", "9", "3"] {
        let _ = enqueue(&INBOUND, topic, payload.as_bytes());
    }

    let frame_loop = StreamLoop::new(
        service,
        SimCamera::new(),
        MqttBus::new(&INBOUND),
        hw,
        SystemDelay,
        sink,
        Esp32TimeAdapter::new(),
    );
    let mut server = SimStreamServer::new(config.stream_path.as_str(), 2, 8);
    server.stream(frame_loop)?;

    for report in server.reports() {
        info!(
            "SIM | session {}: {} frames, {} bytes",
            report.session, report.frames, report.bytes
        );
    }
    wifi.disconnect();
    Ok(())
}

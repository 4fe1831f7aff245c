//! Integration tests for the per-frame loop: one bus message per frame,
//! session lifecycle and camera failure handling.

use rovercam::adapters::camera::SimCamera;
use rovercam::adapters::stream_server::SimStreamServer;
use rovercam::app::actuation::{PulseWidth, PwmChannel};
use rovercam::app::events::{SessionEvent, SessionKind};
use rovercam::app::ports::{FrameHandler, StreamServer};
use rovercam::app::service::RoverService;
use rovercam::app::stream::StreamLoop;
use rovercam::config::SystemConfig;

use crate::mock_hw::{Call, CallLog, MockDelay, MockHardware, RecordingSink, ScriptedBus, Seen, StepClock};

type Loop = StreamLoop<SimCamera, ScriptedBus, MockHardware, MockDelay, RecordingSink, StepClock>;

fn make_loop(camera: SimCamera, payloads: &[&[u8]]) -> (Loop, CallLog, RecordingSink) {
    let log = CallLog::new();
    let sink = RecordingSink::new();
    let frame_loop = StreamLoop::new(
        RoverService::new(&SystemConfig::default()),
        camera,
        ScriptedBus::new(payloads),
        MockHardware::new(&log),
        MockDelay::new(&log),
        sink.clone(),
        StepClock::new(50_000),
    );
    (frame_loop, log, sink)
}

#[test]
fn each_frame_services_at_most_one_message() {
    let (mut frame_loop, log, sink) = make_loop(SimCamera::new(), &[b"8", b"4", b"9"]);

    frame_loop.next_frame("/", 1).unwrap();
    assert_eq!(log.writes(), vec![Call::Lights(true)]);

    frame_loop.next_frame("/", 1).unwrap();
    frame_loop.next_frame("/", 1).unwrap();
    frame_loop.next_frame("/", 1).unwrap();

    assert_eq!(
        log.writes(),
        vec![
            Call::Lights(true),
            Call::Pulse(PwmChannel::Lift, PulseWidth::HIGH),
            Call::Lights(false)
        ]
    );
    assert_eq!(sink.applied(), vec!["LIGHTS ON", "WHEELS UP", "LIGHTS OFF"]);
    assert_eq!(frame_loop.service().applied_count(), 3);
}

#[test]
fn capture_failure_emits_event_and_skips_commands() {
    let (mut frame_loop, log, sink) = make_loop(SimCamera::failing_after(1), &[b"8", b"9"]);

    assert!(frame_loop.next_frame("/", 1).is_ok());
    assert!(frame_loop.next_frame("/", 1).is_err());

    assert_eq!(log.writes(), vec![Call::Lights(true)]);
    assert_eq!(sink.seen().last(), Some(&Seen::FrameFailed));
}

#[test]
fn play_resets_clock_and_teardown_reports_fps() {
    let (mut frame_loop, _log, sink) = make_loop(SimCamera::new(), &[]);

    frame_loop.on_session(&SessionEvent::new(SessionKind::Setup, "/", 3));
    frame_loop.on_session(&SessionEvent::new(SessionKind::Play, "/", 3));
    for _ in 0..4 {
        frame_loop.next_frame("/", 3).unwrap();
    }
    assert_eq!(frame_loop.clock().frames(), 4);
    frame_loop.on_session(&SessionEvent::new(SessionKind::Teardown, "/", 3));

    let seen = sink.seen();
    assert_eq!(seen[0], Seen::Session(SessionKind::Setup, 3, None));
    assert_eq!(seen[1], Seen::Session(SessionKind::Play, 3, None));
    // 4 frames, 50 ms apart.
    match seen[2] {
        Seen::Session(SessionKind::Teardown, 3, Some(fps)) => {
            assert!((fps - 20.0).abs() < 0.01, "fps = {fps}");
        }
        ref other => panic!("unexpected event {other:?}"),
    }

    // A new viewer starts counting from zero.
    frame_loop.on_session(&SessionEvent::new(SessionKind::Play, "/", 4));
    assert_eq!(frame_loop.clock().frames(), 0);
}

#[test]
fn sim_server_drives_whole_sessions() {
    let (frame_loop, log, sink) = make_loop(
        SimCamera::new(),
        &[b"1", b"0", b"x", b"6", b"7"],
    );
    let mut server = SimStreamServer::new("/", 2, 3);
    server.stream(frame_loop).unwrap();

    assert_eq!(
        sink.sessions(),
        vec![
            (SessionKind::Setup, 1),
            (SessionKind::Play, 1),
            (SessionKind::Teardown, 1),
            (SessionKind::Setup, 2),
            (SessionKind::Play, 2),
            (SessionKind::Teardown, 2),
        ]
    );
    let frames: Vec<u32> = server.reports().iter().map(|r| r.frames).collect();
    assert_eq!(frames, vec![3, 3]);

    // Commands carry over between sessions; "x" is dropped.
    assert_eq!(sink.applied(), vec!["FORWARD", "STOP", "WINCH DOWN", "WINCH STOP"]);
    assert_eq!(
        log.calls(),
        vec![
            Call::Pulse(PwmChannel::DriveA, PulseWidth::HIGH),
            Call::Delay(100),
            Call::Pulse(PwmChannel::DriveB, PulseWidth::LOW),
            Call::Pulse(PwmChannel::DriveA, PulseWidth::OFF),
            Call::Pulse(PwmChannel::DriveB, PulseWidth::OFF),
            Call::Pulse(PwmChannel::Winch, PulseWidth::HIGH),
            Call::Pulse(PwmChannel::Winch, PulseWidth::OFF),
        ]
    );
}

//! Integration tests for the bus message → RoverService → actuators
//! pipeline, including pause placement between paired motor writes.

use rovercam::app::actuation::{PulseWidth, PwmChannel};
use rovercam::app::commands::{DecodeError, DriveCommand, InboundMessage};
use rovercam::app::service::RoverService;
use rovercam::config::SystemConfig;

use crate::mock_hw::{Call, CallLog, MockDelay, MockHardware, RecordingSink, Seen};

use PwmChannel::{DriveA, DriveB, Lift, Winch};

const HIGH: PulseWidth = PulseWidth::HIGH;
const LOW: PulseWidth = PulseWidth::LOW;
const OFF: PulseWidth = PulseWidth::OFF;

struct Rig {
    service: RoverService,
    log: CallLog,
    hw: MockHardware,
    delay: MockDelay,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let log = CallLog::new();
        Self {
            service: RoverService::new(&SystemConfig::default()),
            hw: MockHardware::new(&log),
            delay: MockDelay::new(&log),
            log,
            sink: RecordingSink::new(),
        }
    }

    fn send(&mut self, payload: &[u8]) -> Result<DriveCommand, DecodeError> {
        let msg = InboundMessage::new("nicla/test", payload).unwrap();
        self.service
            .handle_message(&msg, &mut self.hw, &mut self.delay, &mut self.sink)
    }
}

// ── Command table ─────────────────────────────────────────────

#[test]
fn start_parks_everything() {
    let mut rig = Rig::new();
    rig.service.start(&mut rig.hw, &mut rig.sink);
    assert_eq!(rig.log.calls(), vec![Call::AllOff]);
    assert_eq!(rig.sink.seen(), vec![Seen::Started]);
}

#[test]
fn forward_writes_a_high_pause_b_low() {
    let mut rig = Rig::new();
    assert_eq!(rig.send(b"1"), Ok(DriveCommand::Forward));
    assert_eq!(
        rig.log.calls(),
        vec![Call::Pulse(DriveA, HIGH), Call::Delay(100), Call::Pulse(DriveB, LOW)]
    );
}

#[test]
fn left_and_right_use_the_modifier_digit() {
    let mut rig = Rig::new();
    assert_eq!(rig.send(b"11"), Ok(DriveCommand::Left));
    assert_eq!(
        rig.log.calls(),
        vec![Call::Pulse(DriveA, LOW), Call::Delay(100), Call::Pulse(DriveB, LOW)]
    );

    rig.log.clear();
    assert_eq!(rig.send(b"21"), Ok(DriveCommand::Right));
    assert_eq!(
        rig.log.calls(),
        vec![Call::Pulse(DriveA, HIGH), Call::Delay(100), Call::Pulse(DriveB, HIGH)]
    );
}

#[test]
fn unknown_modifier_falls_back_to_forward() {
    let mut rig = Rig::new();
    for payload in [&b"31"[..], b"x1", b"91", b"01"] {
        assert_eq!(rig.send(payload), Ok(DriveCommand::Forward), "{payload:?}");
    }
}

#[test]
fn backward_writes_a_low_pause_b_high() {
    let mut rig = Rig::new();
    assert_eq!(rig.send(b"2"), Ok(DriveCommand::Backward));
    assert_eq!(
        rig.log.calls(),
        vec![Call::Pulse(DriveA, LOW), Call::Delay(100), Call::Pulse(DriveB, HIGH)]
    );
}

#[test]
fn stop_zeroes_both_drives_without_pause() {
    let mut rig = Rig::new();
    rig.send(b"0").unwrap();
    assert_eq!(rig.log.calls(), vec![Call::Pulse(DriveA, OFF), Call::Pulse(DriveB, OFF)]);
}

#[test]
fn single_channel_commands_never_pause() {
    let cases: [(&[u8], Call); 7] = [
        (b"3", Call::Pulse(Lift, LOW)),
        (b"4", Call::Pulse(Lift, HIGH)),
        (b"5", Call::Pulse(Winch, LOW)),
        (b"6", Call::Pulse(Winch, HIGH)),
        (b"7", Call::Pulse(Winch, OFF)),
        (b"8", Call::Lights(true)),
        (b"9", Call::Lights(false)),
    ];
    for (payload, expected) in cases {
        let mut rig = Rig::new();
        rig.send(payload).unwrap();
        assert_eq!(rig.log.calls(), vec![expected], "{payload:?}");
    }
}

#[test]
fn only_the_last_character_selects_the_command() {
    let mut rig = Rig::new();
    assert_eq!(rig.send(b"hello 8"), Ok(DriveCommand::LightsOn));
    assert_eq!(rig.send(b"1234"), Ok(DriveCommand::WheelsUp));
}

#[test]
fn pair_delay_follows_config() {
    let log = CallLog::new();
    let config = SystemConfig {
        pair_delay_ms: 250,
        ..SystemConfig::default()
    };
    let mut service = RoverService::new(&config);
    let msg = InboundMessage::new("nicla/test", b"2").unwrap();
    service
        .handle_message(
            &msg,
            &mut MockHardware::new(&log),
            &mut MockDelay::new(&log),
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert!(log.calls().contains(&Call::Delay(250)));
}

// ── Rejections ────────────────────────────────────────────────

#[test]
fn rejected_payloads_never_touch_hardware() {
    let mut rig = Rig::new();
    assert_eq!(rig.send(b""), Err(DecodeError::Empty));
    assert_eq!(rig.send(b"go"), Err(DecodeError::NotADigit('o')));
    assert_eq!(rig.send(&[0xFF, 0xFE]), Err(DecodeError::InvalidUtf8));
    assert_eq!(rig.send(b"1\n"), Err(DecodeError::NotADigit('\n')));

    assert!(rig.log.calls().is_empty());
    assert_eq!(rig.service.rejected_count(), 4);
    assert_eq!(rig.service.applied_count(), 0);
}

#[test]
fn last_command_tracks_text_payloads_only() {
    let mut rig = Rig::new();
    rig.send(b"21").unwrap();
    assert_eq!(rig.service.last_command(), "21");

    let _ = rig.send(b"nope");
    assert_eq!(rig.service.last_command(), "nope");

    let _ = rig.send(&[0xC3, 0x28]);
    assert_eq!(rig.service.last_command(), "nope");
}

#[test]
fn events_report_text_then_command_name() {
    let mut rig = Rig::new();
    rig.send(b"11").unwrap();
    let _ = rig.send(b"?");
    assert_eq!(
        rig.sink.seen(),
        vec![
            Seen::Received("11".into()),
            Seen::Applied("LEFT"),
            Seen::Received("?".into()),
            Seen::Rejected,
        ]
    );
}

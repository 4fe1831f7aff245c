//! Property tests for the command decoder and actuation plans.
//!
//! Runs on host (x86_64) only: proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use embedded_hal::delay::DelayNs;
use proptest::prelude::*;
use rovercam::app::actuation::{PulseWidth, PwmChannel, Step, execute};
use rovercam::app::commands::{DecodeError, DriveCommand, InboundMessage, MAX_PAYLOAD_LEN, decode};
use rovercam::app::events::AppEvent;
use rovercam::app::ports::{ActuatorPort, EventSink};
use rovercam::app::service::RoverService;
use rovercam::config::SystemConfig;

#[derive(Default)]
struct CountingHw {
    writes: usize,
}

impl ActuatorPort for CountingHw {
    fn set_pulse_width(&mut self, _channel: PwmChannel, _width: PulseWidth) {
        self.writes += 1;
    }

    fn set_lights(&mut self, _on: bool) {
        self.writes += 1;
    }

    fn all_off(&mut self) {
        self.writes += 1;
    }
}

#[derive(Default)]
struct CountingDelay {
    pauses: usize,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.pauses += 1;
    }

    fn delay_ms(&mut self, _ms: u32) {
        self.pauses += 1;
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent<'_>) {}
}

fn is_paired(cmd: DriveCommand) -> bool {
    matches!(
        cmd,
        DriveCommand::Forward | DriveCommand::Left | DriveCommand::Right | DriveCommand::Backward
    )
}

fn is_forward_family(cmd: DriveCommand) -> bool {
    matches!(cmd, DriveCommand::Forward | DriveCommand::Left | DriveCommand::Right)
}

proptest! {
    /// Arbitrary bytes decode to a command or a typed error, never a panic.
    #[test]
    fn decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN)) {
        let _ = decode(&bytes);
    }

    /// Any text ending in a digit decodes; the digit alone picks the family.
    #[test]
    fn digit_tail_always_decodes(prefix in "[ -~]{0,16}", digit in 0u32..10) {
        let text = format!("{prefix}{digit}");
        let cmd = decode(text.as_bytes());
        prop_assert!(cmd.is_ok(), "{:?} -> {:?}", text, cmd);
        let cmd = cmd.unwrap();
        prop_assert_eq!(is_forward_family(cmd), digit == 1);
    }

    /// Paired drive plans are pulse, pause, pulse; stop is two pulses;
    /// everything else is a single step. Only paired plans pause.
    #[test]
    fn plan_shape(prefix in "[0-9]{0,2}", digit in 0u32..10) {
        let cmd = decode(format!("{prefix}{digit}").as_bytes()).unwrap();
        let plan = cmd.plan();
        let pauses = plan.iter().filter(|s| **s == Step::Pause).count();
        if is_paired(cmd) {
            prop_assert_eq!(plan.len(), 3);
            prop_assert_eq!(plan[1], Step::Pause);
            prop_assert_eq!(pauses, 1);
        } else if cmd == DriveCommand::Stop {
            prop_assert_eq!(plan.len(), 2);
            prop_assert_eq!(pauses, 0);
        } else {
            prop_assert_eq!(plan.len(), 1);
            prop_assert_eq!(pauses, 0);
        }

        let mut hw = CountingHw::default();
        let mut delay = CountingDelay::default();
        execute(&plan, &mut hw, &mut delay, 100);
        prop_assert_eq!(hw.writes + delay.pauses, plan.len());
    }

    /// Payloads whose last character is not a digit never reach hardware.
    #[test]
    fn non_digit_tail_never_writes(prefix in "[ -~]{0,16}", tail in "[^0-9]") {
        let text = format!("{prefix}{tail}");
        prop_assume!(text.len() <= MAX_PAYLOAD_LEN);
        let msg = InboundMessage::new("nicla/test", text.as_bytes()).unwrap();

        let mut service = RoverService::new(&SystemConfig::default());
        let mut hw = CountingHw::default();
        let mut delay = CountingDelay::default();
        let result = service.handle_message(&msg, &mut hw, &mut delay, &mut NullSink);

        prop_assert!(matches!(result, Err(DecodeError::NotADigit(_))));
        prop_assert_eq!(hw.writes, 0);
        prop_assert_eq!(delay.pauses, 0);
    }
}

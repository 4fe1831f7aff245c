//! Command → actuator lookup.
//!
//! Each [`DriveCommand`] maps to a fixed, ordered list of [`Step`]s. The
//! mapping is pure; [`execute`] replays a plan against an
//! [`ActuatorPort`] and sleeps on [`Step::Pause`].
//!
//! Pulse widths are timer ticks at [`TICKS_PER_US`] ticks per
//! microsecond:
//!
//! | Ticks | Pulse   |
//! |-------|---------|
//! | 20000 | 2500 µs |
//! | 12000 | 1500 µs |
//! | 4000  | 500 µs  |
//!
//! The drive pair is written A first, then B after the pair delay. The
//! motors face opposite directions on the chassis, so "forward" drives A
//! high and B low.
//!
//! NOTE: the hand-written control table that shipped with the first
//! revision lists forward as A=4000/B=20000 and backwards as
//! A=20000/B=4000. The values below are the ones the vehicle has always
//! actually been driven with; the table was never reconciled.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::commands::DriveCommand;
use super::ports::ActuatorPort;

/// Reference timer ticks per microsecond.
pub const TICKS_PER_US: u32 = 8;

/// Servo/ESC pulse width in timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PulseWidth(pub u16);

impl PulseWidth {
    /// Output held low.
    pub const OFF: Self = Self(0);
    /// 500 µs
    pub const LOW: Self = Self(4000);
    /// 1500 µs
    pub const CENTRE: Self = Self(12000);
    /// 2500 µs
    pub const HIGH: Self = Self(20000);

    pub const fn ticks(self) -> u16 {
        self.0
    }

    pub const fn as_micros(self) -> u32 {
        self.0 as u32 / TICKS_PER_US
    }
}

/// The four PWM outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    /// Wheel lift servo.
    Lift,
    /// Winch motor.
    Winch,
    /// Drive motor A.
    DriveA,
    /// Drive motor B.
    DriveB,
}

impl PwmChannel {
    pub const ALL: [Self; 4] = [Self::Lift, Self::Winch, Self::DriveA, Self::DriveB];
}

/// One hardware action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pulse { channel: PwmChannel, width: PulseWidth },
    /// Wait the configured pair delay.
    Pause,
    Lights(bool),
}

/// Longest plan any command produces (pulse, pause, pulse).
pub const MAX_STEPS: usize = 3;

pub type ActuationPlan = Vec<Step, MAX_STEPS>;

const fn pulse(channel: PwmChannel, width: PulseWidth) -> Step {
    Step::Pulse { channel, width }
}

impl DriveCommand {
    /// Hardware steps for this command.
    pub fn plan(self) -> ActuationPlan {
        use PulseWidth as W;
        use PwmChannel::{DriveA, DriveB, Lift, Winch};

        let steps: &[Step] = match self {
            Self::Stop => &[pulse(DriveA, W::OFF), pulse(DriveB, W::OFF)],
            Self::Forward => &[pulse(DriveA, W::HIGH), Step::Pause, pulse(DriveB, W::LOW)],
            Self::Left => &[pulse(DriveA, W::LOW), Step::Pause, pulse(DriveB, W::LOW)],
            Self::Right => &[pulse(DriveA, W::HIGH), Step::Pause, pulse(DriveB, W::HIGH)],
            Self::Backward => &[pulse(DriveA, W::LOW), Step::Pause, pulse(DriveB, W::HIGH)],
            Self::WheelsDown => &[pulse(Lift, W::LOW)],
            Self::WheelsUp => &[pulse(Lift, W::HIGH)],
            Self::WinchUp => &[pulse(Winch, W::LOW)],
            Self::WinchDown => &[pulse(Winch, W::HIGH)],
            Self::WinchStop => &[pulse(Winch, W::OFF)],
            Self::LightsOn => &[Step::Lights(true)],
            Self::LightsOff => &[Step::Lights(false)],
        };
        // Every table row fits in MAX_STEPS.
        Vec::from_slice(steps).unwrap_or_default()
    }
}

/// Apply `plan` in order, sleeping `pair_delay_ms` on each pause.
pub fn execute(
    plan: &[Step],
    hw: &mut impl ActuatorPort,
    delay: &mut impl DelayNs,
    pair_delay_ms: u32,
) {
    for step in plan {
        match *step {
            Step::Pulse { channel, width } => hw.set_pulse_width(channel, width),
            Step::Pause => delay.delay_ms(pair_delay_ms),
            Step::Lights(on) => hw.set_lights(on),
        }
    }
}

//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the four pulse channels and the lights driver, exposing them
//! through [`ActuatorPort`]. This is the only module in the system that
//! writes to actuators. On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use crate::app::actuation::{PulseWidth, PwmChannel};
use crate::app::ports::ActuatorPort;
use crate::drivers::hw_init;
use crate::drivers::lights::Lights;
use crate::drivers::pulse_channel::PulseChannel;

/// Concrete adapter that combines all actuators behind [`ActuatorPort`].
pub struct HardwareAdapter {
    lift: PulseChannel,
    winch: PulseChannel,
    drive_a: PulseChannel,
    drive_b: PulseChannel,
    lights: Lights,
}

impl HardwareAdapter {
    /// Channels must already be configured by
    /// [`hw_init::init_peripherals`] at the same frequency.
    pub fn new(pwm_frequency_hz: u32) -> Self {
        Self {
            lift: PulseChannel::new(hw_init::LEDC_CH_LIFT, pwm_frequency_hz),
            winch: PulseChannel::new(hw_init::LEDC_CH_WINCH, pwm_frequency_hz),
            drive_a: PulseChannel::new(hw_init::LEDC_CH_DRIVE_A, pwm_frequency_hz),
            drive_b: PulseChannel::new(hw_init::LEDC_CH_DRIVE_B, pwm_frequency_hz),
            lights: Lights::new(),
        }
    }

    fn channel_mut(&mut self, channel: PwmChannel) -> &mut PulseChannel {
        match channel {
            PwmChannel::Lift => &mut self.lift,
            PwmChannel::Winch => &mut self.winch,
            PwmChannel::DriveA => &mut self.drive_a,
            PwmChannel::DriveB => &mut self.drive_b,
        }
    }

    /// Last pulse width written to `channel`.
    pub fn pulse_width(&self, channel: PwmChannel) -> PulseWidth {
        match channel {
            PwmChannel::Lift => self.lift.width(),
            PwmChannel::Winch => self.winch.width(),
            PwmChannel::DriveA => self.drive_a.width(),
            PwmChannel::DriveB => self.drive_b.width(),
        }
    }

    pub fn lights_on(&self) -> bool {
        self.lights.is_on()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_pulse_width(&mut self, channel: PwmChannel, width: PulseWidth) {
        self.channel_mut(channel).set(width);
    }

    fn set_lights(&mut self, on: bool) {
        self.lights.set(on);
    }

    fn all_off(&mut self) {
        for channel in PwmChannel::ALL {
            self.channel_mut(channel).off();
        }
        self.lights.set(false);
    }
}

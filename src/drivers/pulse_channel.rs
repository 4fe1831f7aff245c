//! Servo/ESC pulse output on one LEDC channel.
//!
//! Pulse widths arrive as reference timer ticks ([`TICKS_PER_US`] per
//! microsecond) and are scaled onto the LEDC duty range:
//!
//! ```text
//! duty = ticks * 2^resolution / period_ticks,  period_ticks = 8 MHz / freq
//! ```
//!
//! At 250 Hz the period is 32000 ticks, so 20000 ticks (2500 µs) is a
//! 62.5 % duty cycle.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::actuation::{PulseWidth, TICKS_PER_US};
use crate::drivers::hw_init;
use crate::pins;

/// Reference tick rate in Hz.
const TICK_HZ: u32 = TICKS_PER_US * 1_000_000;

/// Convert a tick pulse width into an LEDC duty value, clamped to full on.
pub fn pulse_to_duty(width: PulseWidth, freq_hz: u32, resolution_bits: u32) -> u32 {
    let period_ticks = u64::from(TICK_HZ / freq_hz.max(1));
    let full = 1u64 << resolution_bits;
    let duty = u64::from(width.ticks()) * full / period_ticks.max(1);
    duty.min(full) as u32
}

pub struct PulseChannel {
    ledc_channel: u32,
    freq_hz: u32,
    width: PulseWidth,
    hw_duty: u32,
}

impl PulseChannel {
    pub fn new(ledc_channel: u32, freq_hz: u32) -> Self {
        Self {
            ledc_channel,
            freq_hz,
            width: PulseWidth::OFF,
            hw_duty: 0,
        }
    }

    pub fn set(&mut self, width: PulseWidth) {
        let duty = pulse_to_duty(width, self.freq_hz, pins::PWM_RESOLUTION_BITS);
        hw_init::ledc_set(self.ledc_channel, duty);
        self.width = width;
        self.hw_duty = duty;
    }

    pub fn off(&mut self) {
        self.set(PulseWidth::OFF);
    }

    pub fn width(&self) -> PulseWidth {
        self.width
    }

    pub fn current_duty(&self) -> u32 {
        self.hw_duty
    }
}

//! Headlight driver: one push-pull GPIO.
//!
//! On ESP-IDF: drives the GPIO level via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct Lights {
    on: bool,
}

impl Lights {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::LIGHTS_GPIO, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Default for Lights {
    fn default() -> Self {
        Self::new()
    }
}

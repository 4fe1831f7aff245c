//! Actuator drivers, hardware initialisation, and thread helpers.

pub mod hw_init;
pub mod lights;
pub mod pulse_channel;
pub mod task_pin;

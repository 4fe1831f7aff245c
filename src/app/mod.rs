//! Application core: pure domain logic, zero I/O.
//!
//! Command decoding, the command → actuator table, the per-frame control
//! loop and the frame clock. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod actuation;
pub mod clock;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod stream;

//! Fuzz target: `commands::decode` and `DriveCommand::plan`
//!
//! Drives arbitrary payload bytes through the decoder and asserts that it
//! never panics, that a successful decode implies a digit tail, and that
//! every plan fits the fixed step buffer.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use rovercam::app::actuation::MAX_STEPS;
use rovercam::app::commands::{InboundMessage, decode};

fuzz_target!(|data: &[u8]| {
    if let Ok(cmd) = decode(data) {
        let last = core::str::from_utf8(data).ok().and_then(|s| s.chars().last());
        assert!(last.is_some_and(|c| c.is_ascii_digit()), "decoded without a digit tail");
        let plan = cmd.plan();
        assert!(!plan.is_empty() && plan.len() <= MAX_STEPS);
    }

    // Oversized payloads are refused, never truncated.
    if let Some(msg) = InboundMessage::new("nicla/test", data) {
        assert_eq!(msg.payload.as_slice(), data);
    }
});

//! Frame-rate clock.
//!
//! Ticked once per delivered frame; reset when a viewer starts playing.
//! FPS is averaged over the frames since the last reset.

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    started_us: Option<u64>,
    last_us: u64,
    frames: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a frame boundary at `now_us`. The first tick after a reset
    /// only marks the start.
    pub fn tick(&mut self, now_us: u64) {
        match self.started_us {
            None => self.started_us = Some(now_us),
            Some(_) => self.frames = self.frames.saturating_add(1),
        }
        self.last_us = now_us;
    }

    /// Frames counted since the last reset (excluding the start mark).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Average frames per second, `0.0` until two ticks have been seen.
    pub fn fps(&self) -> f32 {
        let Some(start) = self.started_us else {
            return 0.0;
        };
        let elapsed_us = self.last_us.saturating_sub(start);
        if elapsed_us == 0 {
            return 0.0;
        }
        self.frames as f32 * 1_000_000.0 / elapsed_us as f32
    }
}

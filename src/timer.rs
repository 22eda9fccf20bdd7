//! Frame timing.
//!
//! The clock itself belongs to the window (SDL's millisecond tick counter);
//! [`FrameLimiter`] only does the bookkeeping on those ticks, so it can be
//! driven by any monotonically increasing millisecond source.

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: u64 = 1000 / FPS;

/// Timing information for one simulated tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the first tick.
    pub total: f32,
}

impl FrameTime {
    pub fn new(delta: f32, total: f32) -> Self {
        Self { delta, total }
    }
}

/// Caps the frame rate and turns tick readings into [`FrameTime`]s.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    start_ticks: u64,
    previous_frame_time: u64,
    target_frame_time: u64,
}

impl FrameLimiter {
    /// Starts counting at `now_ms` with the default [`FPS`] cap.
    pub fn new(now_ms: u64) -> Self {
        Self::with_target(now_ms, FRAME_TARGET_TIME)
    }

    pub fn with_target(now_ms: u64, target_frame_time: u64) -> Self {
        Self {
            start_ticks: now_ms,
            previous_frame_time: now_ms,
            target_frame_time,
        }
    }

    /// Milliseconds left to wait before the next frame may start.
    pub fn remaining(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.previous_frame_time);
        self.target_frame_time.saturating_sub(elapsed)
    }

    /// Closes the current frame at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> FrameTime {
        let delta = now_ms.saturating_sub(self.previous_frame_time);
        self.previous_frame_time = now_ms;
        let total = now_ms.saturating_sub(self.start_ticks);
        FrameTime::new(delta as f32 / 1000.0, total as f32 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fast_frame_waits_for_the_rest_of_the_budget() {
        let limiter = FrameLimiter::new(1_000);
        assert_eq!(limiter.remaining(1_004), FRAME_TARGET_TIME - 4);
        assert_eq!(limiter.remaining(1_000 + FRAME_TARGET_TIME), 0);
        assert_eq!(limiter.remaining(1_100), 0);
    }

    #[test]
    fn advance_reports_delta_and_total_in_seconds() {
        let mut limiter = FrameLimiter::with_target(500, 20);
        let first = limiter.advance(520);
        assert_relative_eq!(first.delta, 0.02);
        assert_relative_eq!(first.total, 0.02);

        let second = limiter.advance(570);
        assert_relative_eq!(second.delta, 0.05);
        assert_relative_eq!(second.total, 0.07);
        assert_eq!(limiter.remaining(575), 15);
    }

    #[test]
    fn clock_going_backwards_yields_zero_delta() {
        let mut limiter = FrameLimiter::new(100);
        let time = limiter.advance(90);
        assert_eq!(time.delta, 0.0);
        assert_eq!(time.total, 0.0);
    }
}

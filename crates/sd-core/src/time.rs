//! Frame clock
//!
//! All animation runs on a 60 fps logical clock. `update` calls receive a frame
//! delta (1.0 = one nominal frame); timers and tweens convert it to milliseconds.

/// Nominal frames per second of the render loop
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Duration of one nominal frame in milliseconds
pub const FRAME_MS: f64 = 1000.0 / FRAMES_PER_SECOND;

/// Convert a frame delta to elapsed milliseconds
#[inline]
pub fn frames_to_ms(delta_frames: f64) -> f64 {
    delta_frames * FRAME_MS
}

/// Convert elapsed milliseconds to a frame delta
#[inline]
pub fn ms_to_frames(ms: f64) -> f64 {
    ms / FRAME_MS
}

/// Turns absolute browser timestamps into frame deltas.
///
/// The first sample yields a delta of exactly one frame; long stalls (tab in
/// background) are clamped so a single update never jumps more than `max_delta`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            max_delta: 4.0,
        }
    }

    pub fn with_max_delta(max_delta: f64) -> Self {
        Self {
            last_ms: None,
            max_delta: max_delta.max(1.0),
        }
    }

    /// Feed an absolute timestamp (ms) and get the frame delta since the previous one
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_ms {
            Some(last) => ms_to_frames((now_ms - last).max(0.0)),
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        delta.min(self.max_delta)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_conversion() {
        assert_relative_eq!(frames_to_ms(1.0), 16.666_666, epsilon = 1e-5);
        assert_relative_eq!(ms_to_frames(200.0), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_clock_clamps_stalls() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1000.0), 1.0);
        assert_relative_eq!(clock.tick(1000.0 + FRAME_MS * 2.0), 2.0, epsilon = 1e-9);
        // five seconds in background
        assert_eq!(clock.tick(6000.0), 4.0);
    }
}

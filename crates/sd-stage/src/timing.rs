//! Timing — delays between spin phases and the virtual timeline that runs them
//!
//! STAGES don't inherently have timing. This module adds the time dimension
//! based on configurable timing profiles, and provides [`Timeline`], an ordered
//! list of actions at cumulative delays that the frame loop advances.

use std::collections::VecDeque;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Timing profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay speed
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Instant (no delays, for testing)
    Instant,
    /// Scaled from normal by a custom factor
    Custom,
}

impl TimingProfile {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Turbo => "Turbo",
            Self::Instant => "Instant",
            Self::Custom => "Custom",
        }
    }

    /// Parse a profile name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "turbo" => Some(Self::Turbo),
            "instant" => Some(Self::Instant),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Delays used by the reel group sequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile identifier
    pub profile: TimingProfile,

    /// Delay before each reel starts (ms)
    pub reel_start_interval_ms: f64,

    /// Hold after the last start, per reel in the group (ms)
    pub start_hold_per_reel_ms: f64,

    /// Lower bound of the random delay before each reel stops (ms, inclusive)
    pub reel_stop_delay_min_ms: f64,

    /// Upper bound of the random delay before each reel stops (ms, exclusive)
    pub reel_stop_delay_max_ms: f64,

    /// Pause after the last reel is released (ms)
    pub stop_tail_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            reel_start_interval_ms: 100.0,
            start_hold_per_reel_ms: 100.0,
            reel_stop_delay_min_ms: 100.0,
            reel_stop_delay_max_ms: 700.0,
            stop_tail_ms: 350.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            ..Self::normal().scaled(0.5)
        }
    }

    /// Instant timing (for testing)
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            reel_start_interval_ms: 0.0,
            start_hold_per_reel_ms: 0.0,
            reel_stop_delay_min_ms: 0.0,
            reel_stop_delay_max_ms: 0.0,
            stop_tail_ms: 0.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal | TimingProfile::Custom => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            reel_start_interval_ms: self.reel_start_interval_ms * factor,
            start_hold_per_reel_ms: self.start_hold_per_reel_ms * factor,
            reel_stop_delay_min_ms: self.reel_stop_delay_min_ms * factor,
            reel_stop_delay_max_ms: self.reel_stop_delay_max_ms * factor,
            stop_tail_ms: self.stop_tail_ms * factor,
        }
    }

    /// Half-open range for the per-reel stop delay; `None` when it is degenerate
    pub fn stop_delay_range(&self) -> Option<Range<f64>> {
        (self.reel_stop_delay_max_ms > self.reel_stop_delay_min_ms)
            .then(|| self.reel_stop_delay_min_ms..self.reel_stop_delay_max_ms)
    }

    /// Total duration of the start sequence for `reel_count` reels
    pub fn start_sequence_ms(&self, reel_count: usize) -> f64 {
        let n = reel_count as f64;
        n * self.reel_start_interval_ms + n * self.start_hold_per_reel_ms
    }

    /// Shortest and longest possible stop sequence for `reel_count` reels
    pub fn stop_sequence_bounds_ms(&self, reel_count: usize) -> (f64, f64) {
        let n = reel_count as f64;
        (
            n * self.reel_stop_delay_min_ms + self.stop_tail_ms,
            n * self.reel_stop_delay_max_ms.max(self.reel_stop_delay_min_ms) + self.stop_tail_ms,
        )
    }
}

/// Actions at cumulative delays on a virtual clock.
///
/// Built by chaining [`Timeline::after`] (wait, then act) and
/// [`Timeline::hold`] (wait only). [`Timeline::advance`] moves the clock and
/// returns every action that became due, in schedule order. The timeline is
/// finished once all actions fired and the clock passed the final hold.
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    steps: VecDeque<(f64, A)>,
    cursor_ms: f64,
    elapsed_ms: f64,
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            cursor_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Schedule `action` `delay_ms` after the previous step
    pub fn after(mut self, delay_ms: f64, action: A) -> Self {
        self.cursor_ms += delay_ms.max(0.0);
        self.steps.push_back((self.cursor_ms, action));
        self
    }

    /// Extend the timeline by `delay_ms` without an action
    pub fn hold(mut self, delay_ms: f64) -> Self {
        self.cursor_ms += delay_ms.max(0.0);
        self
    }

    /// Advance the clock by `ms` and collect the actions that became due
    pub fn advance(&mut self, ms: f64) -> Vec<A> {
        self.elapsed_ms += ms.max(0.0);
        let mut due = Vec::new();
        while self
            .steps
            .front()
            .is_some_and(|(at, _)| *at <= self.elapsed_ms)
        {
            if let Some((_, action)) = self.steps.pop_front() {
                due.push(action);
            }
        }
        due
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty() && self.elapsed_ms >= self.cursor_ms
    }

    /// Total scheduled length
    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.cursor_ms
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.cursor_ms - self.elapsed_ms).max(0.0)
    }

    pub fn pending(&self) -> usize {
        self.steps.len()
    }
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let instant = TimingConfig::instant();

        assert_eq!(turbo.profile, TimingProfile::Turbo);
        assert!(turbo.reel_start_interval_ms < normal.reel_start_interval_ms);
        assert!(turbo.stop_tail_ms < normal.stop_tail_ms);
        assert_eq!(instant.start_sequence_ms(4), 0.0);
        assert!(instant.stop_delay_range().is_none());
    }

    #[test]
    fn test_sequence_bounds() {
        let normal = TimingConfig::normal();
        assert_relative_eq!(normal.start_sequence_ms(4), 800.0);
        let (min, max) = normal.stop_sequence_bounds_ms(4);
        assert_relative_eq!(min, 750.0);
        assert_relative_eq!(max, 3150.0);
        assert_eq!(normal.stop_delay_range(), Some(100.0..700.0));
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(TimingProfile::from_name("TURBO"), Some(TimingProfile::Turbo));
        assert_eq!(TimingProfile::from_name("warp"), None);
    }

    #[test]
    fn test_timeline_fires_in_order() {
        let mut timeline = Timeline::new()
            .after(100.0, "a")
            .after(100.0, "b")
            .hold(200.0);

        assert!(timeline.advance(99.0).is_empty());
        assert_eq!(timeline.advance(1.0), vec!["a"]);
        assert!(!timeline.is_finished());
        assert_eq!(timeline.advance(150.0), vec!["b"]);
        assert!(!timeline.is_finished());
        assert_relative_eq!(timeline.remaining_ms(), 150.0);
        assert!(timeline.advance(150.0).is_empty());
        assert!(timeline.is_finished());
    }

    #[test]
    fn test_timeline_large_step_collects_everything() {
        let mut timeline = Timeline::new().after(10.0, 1).after(0.0, 2).after(5.0, 3);
        assert_eq!(timeline.advance(1000.0), vec![1, 2, 3]);
        assert!(timeline.is_finished());
    }

    #[test]
    fn test_empty_timeline_is_finished() {
        let timeline: Timeline<()> = Timeline::new();
        assert!(timeline.is_finished());
        assert_eq!(timeline.duration_ms(), 0.0);
    }
}

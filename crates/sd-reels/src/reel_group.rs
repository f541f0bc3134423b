//! ReelGroup — ordered reels with staggered start and stop
//!
//! Start: each reel starts `reel_start_interval_ms` after the previous one,
//! then the group holds `start_hold_per_reel_ms × reel_count`.
//! Stop: each reel is released after a random delay in
//! `[reel_stop_delay_min_ms, reel_stop_delay_max_ms)`, then the group holds
//! `stop_tail_ms`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sd_core::{Rect, frames_to_ms};
use sd_stage::{TimingConfig, Timeline};

use crate::reel::{Reel, ReelEvent};

/// Which sequence a timeline belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Start,
    Stop,
}

/// Reported by [`ReelGroup::update`], in the order things happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEvent {
    /// Reel `i` was started
    ReelStarted(usize),
    /// Reel `i` was released
    ReelReleased(usize),
    /// Motion event of reel `i`
    Reel(usize, ReelEvent),
    /// A sequence ran to the end of its trailing hold
    SequenceFinished(SequenceKind),
}

#[derive(Debug)]
struct Sequence {
    kind: SequenceKind,
    timeline: Timeline<usize>,
}

#[derive(Debug)]
pub struct ReelGroup {
    reels: Vec<Reel>,
    spacing: f64,
    bounds: Option<Rect>,
    timing: TimingConfig,
    sequence: Option<Sequence>,
    stop_delays: Vec<f64>,
    rng: StdRng,
}

impl ReelGroup {
    pub fn new(spacing: f64, bounds: Option<Rect>, timing: TimingConfig, seed: u64) -> Self {
        Self {
            reels: Vec::new(),
            spacing,
            bounds,
            timing,
            sequence: None,
            stop_delays: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append a reel below the existing ones
    pub fn add_reel(&mut self, mut reel: Reel) {
        let index = self.reels.len();
        reel.set_y(index as f64 * (reel.height() + self.spacing));
        self.reels.push(reel);
    }

    /// Schedule every reel to start in list order.
    ///
    /// `will_win` does not influence where reels land.
    pub fn start_spin(&mut self, will_win: bool) {
        log::debug!(
            "[ReelGroup] start sequence: {} reels (will_win={})",
            self.reels.len(),
            will_win
        );
        let n = self.reels.len();
        let timeline = (0..n)
            .fold(Timeline::new(), |t, i| {
                t.after(self.timing.reel_start_interval_ms, i)
            })
            .hold(n as f64 * self.timing.start_hold_per_reel_ms);
        self.begin(SequenceKind::Start, timeline);
    }

    /// Schedule every reel to be released in list order with random delays
    pub fn stop_spin(&mut self) {
        let range = self.timing.stop_delay_range();
        let min = self.timing.reel_stop_delay_min_ms;
        self.stop_delays = (0..self.reels.len())
            .map(|_| match &range {
                Some(range) => self.rng.random_range(range.clone()),
                None => min,
            })
            .collect();
        log::debug!("[ReelGroup] stop sequence: delays {:?}", self.stop_delays);

        let timeline = self
            .stop_delays
            .iter()
            .enumerate()
            .fold(Timeline::new(), |t, (i, delay)| t.after(*delay, i))
            .hold(self.timing.stop_tail_ms);
        self.begin(SequenceKind::Stop, timeline);
    }

    fn begin(&mut self, kind: SequenceKind, timeline: Timeline<usize>) {
        if let Some(previous) = &self.sequence {
            log::warn!(
                "[ReelGroup] {:?} sequence replaced by {:?} with {} steps pending",
                previous.kind,
                kind,
                previous.timeline.pending()
            );
        }
        self.sequence = Some(Sequence { kind, timeline });
    }

    /// Advance the active sequence, fire due commands, then move every reel
    pub fn update(&mut self, delta_frames: f64) -> Vec<GroupEvent> {
        let mut events = Vec::new();

        if let Some(sequence) = self.sequence.as_mut() {
            let due = sequence.timeline.advance(frames_to_ms(delta_frames));
            for i in due {
                let Some(reel) = self.reels.get_mut(i) else {
                    continue;
                };
                match sequence.kind {
                    SequenceKind::Start => {
                        reel.start_spin();
                        events.push(GroupEvent::ReelStarted(i));
                    }
                    SequenceKind::Stop => {
                        reel.stop_spin();
                        events.push(GroupEvent::ReelReleased(i));
                    }
                }
            }
            if sequence.timeline.is_finished() {
                let kind = sequence.kind;
                self.sequence = None;
                events.push(GroupEvent::SequenceFinished(kind));
            }
        }

        for (i, reel) in self.reels.iter_mut().enumerate() {
            if let Some(event) = reel.update(delta_frames) {
                events.push(GroupEvent::Reel(i, event));
            }
        }
        events
    }

    /// True while a start or stop sequence is pending
    pub fn is_sequencing(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn active_sequence(&self) -> Option<SequenceKind> {
        self.sequence.as_ref().map(|s| s.kind)
    }

    /// Virtual time spent in the active sequence
    pub fn sequence_elapsed_ms(&self) -> Option<f64> {
        self.sequence.as_ref().map(|s| s.timeline.elapsed_ms())
    }

    /// Delays drawn by the last `stop_spin`
    pub fn stop_delays(&self) -> &[f64] {
        &self.stop_delays
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reel(&self, index: usize) -> Option<&Reel> {
        self.reels.get(index)
    }

    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }

    /// Vertical offset of reel `index`
    pub fn reel_offset(&self, index: usize) -> Option<f64> {
        self.reels.get(index).map(Reel::y)
    }

    /// Mask rectangle, if any
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn any_spinning(&self) -> bool {
        self.reels.iter().any(Reel::is_spinning)
    }

    pub fn all_at_rest(&self) -> bool {
        self.reels.iter().all(Reel::is_at_rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::ReelParams;
    use approx::assert_relative_eq;

    fn group(n: usize, timing: TimingConfig) -> ReelGroup {
        let mut group = ReelGroup::new(10.0, None, timing, 99);
        for i in 0..n {
            group.add_reel(Reel::new(ReelParams::default(), i as u64));
        }
        group
    }

    #[test]
    fn test_reel_offsets() {
        let group = group(4, TimingConfig::normal());
        for i in 0..4 {
            assert_relative_eq!(group.reel_offset(i).unwrap(), i as f64 * 160.0);
        }
        assert_eq!(group.reel_offset(4), None);
    }

    #[test]
    fn test_start_fires_in_order_then_holds() {
        let mut group = group(3, TimingConfig::normal());
        group.start_spin(false);

        let mut started = Vec::new();
        let mut finished_at = None;
        for frame in 1..=200 {
            for event in group.update(1.0) {
                match event {
                    GroupEvent::ReelStarted(i) => started.push(i),
                    GroupEvent::SequenceFinished(SequenceKind::Start) => {
                        finished_at = Some(frame as f64 * sd_core::FRAME_MS)
                    }
                    _ => {}
                }
            }
            if finished_at.is_some() {
                break;
            }
        }

        assert_eq!(started, vec![0, 1, 2]);
        let finished_at = finished_at.unwrap();
        assert!(finished_at >= 3.0 * 100.0 + 3.0 * 100.0);
        assert!(group.any_spinning());
        assert!(!group.is_sequencing());
    }

    #[test]
    fn test_stop_respects_random_delays() {
        let mut group = group(4, TimingConfig::normal());
        group.start_spin(true);
        while group.is_sequencing() {
            group.update(1.0);
        }
        group.stop_spin();

        let delays = group.stop_delays().to_vec();
        assert_eq!(delays.len(), 4);
        assert!(delays.iter().all(|d| (100.0..700.0).contains(d)));

        let mut elapsed = 0.0;
        while group.is_sequencing() {
            group.update(1.0);
            elapsed += sd_core::FRAME_MS;
        }
        assert!(elapsed >= delays.iter().sum::<f64>() + 350.0);
        assert!(!group.any_spinning());
    }

    #[test]
    fn test_reels_start_only_after_their_delay() {
        let mut group = group(2, TimingConfig::normal());
        group.start_spin(false);
        // 5 frames = 83ms, before the first start
        for _ in 0..5 {
            group.update(1.0);
        }
        assert!(group.reels().iter().all(|r| r.speed() == 0.0));
        for _ in 0..2 {
            group.update(1.0);
        }
        assert!(group.reel(0).unwrap().is_spinning());
        assert!(!group.reel(1).unwrap().is_spinning());
    }

    #[test]
    fn test_instant_timing_completes_on_first_update() {
        let mut group = group(4, TimingConfig::instant());
        group.start_spin(false);
        let events = group.update(1.0);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GroupEvent::ReelStarted(_)))
                .count(),
            4
        );
        assert!(events.contains(&GroupEvent::SequenceFinished(SequenceKind::Start)));
    }
}

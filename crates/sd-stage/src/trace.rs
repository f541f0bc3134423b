//! StageTrace — A complete sequence of stage events for a session
//!
//! A trace captures the full timeline of one or more spins.

use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::timing::TimingProfile;

/// Recorded stage events in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Timing profile the machine ran with
    #[serde(default)]
    pub timing_profile: Option<TimingProfile>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,
}

impl StageTrace {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            timing_profile: None,
            events: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: TimingProfile) -> Self {
        self.timing_profile = Some(profile);
        self
    }

    pub fn push(&mut self, event: StageEvent) {
        if let Some(last) = self.events.last() {
            if event.timestamp_ms < last.timestamp_ms {
                log::warn!(
                    "[StageTrace] out-of-order event {} at {:.1}ms (last {:.1}ms)",
                    event.type_name(),
                    event.timestamp_ms,
                    last.timestamp_ms
                );
            }
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Duration from first to last event
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Count events whose stage has the given type name
    pub fn count(&self, type_name: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.type_name() == type_name)
            .count()
    }

    /// First event matching a predicate
    pub fn find(&self, pred: impl Fn(&Stage) -> bool) -> Option<&StageEvent> {
        self.events.iter().find(|e| pred(&e.stage))
    }

    /// Events of one category
    pub fn by_category(&self, category: StageCategory) -> impl Iterator<Item = &StageEvent> {
        self.events
            .iter()
            .filter(move |e| e.stage.category() == category)
    }

    /// Events belonging to one spin
    pub fn spin(&self, spin_index: u64) -> impl Iterator<Item = &StageEvent> {
        self.events
            .iter()
            .filter(move |e| e.spin_index == spin_index)
    }

    /// Check that per-spin ordering holds: SpinStart first, SpinEnd last,
    /// every reel released after its start and every reel stop/settle after
    /// its release within the same spin.
    pub fn validate(&self) -> Result<(), String> {
        let mut spins: Vec<u64> = self.events.iter().map(|e| e.spin_index).collect();
        spins.sort_unstable();
        spins.dedup();

        for spin_index in spins.into_iter().filter(|i| *i > 0) {
            let events: Vec<&StageEvent> = self.spin(spin_index).collect();
            match events.first().map(|e| &e.stage) {
                Some(Stage::SpinStart) => {}
                _ => return Err(format!("spin {spin_index}: first stage is not spin_start")),
            }
            for (pos, event) in events.iter().enumerate() {
                let Some(reel_index) = event.stage.reel_index() else {
                    continue;
                };
                let required = match event.stage {
                    Stage::ReelSpinStop { .. } => Stage::ReelSpinStart { reel_index },
                    Stage::ReelStop { .. } | Stage::ReelSettled { .. } => {
                        Stage::ReelSpinStop { reel_index }
                    }
                    _ => continue,
                };
                if !events[..pos].iter().any(|e| e.stage == required) {
                    return Err(format!(
                        "spin {spin_index}: {} of reel {reel_index} without a preceding {}",
                        event.type_name(),
                        required.type_name()
                    ));
                }
            }
            if let Some(end_pos) = events.iter().position(|e| e.stage == Stage::SpinEnd) {
                if end_pos + 1 != events.len()
                    && events[end_pos + 1..]
                        .iter()
                        .any(|e| e.stage.category() != StageCategory::Reels)
                {
                    return Err(format!("spin {spin_index}: lifecycle stage after spin_end"));
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin_trace() -> StageTrace {
        let mut trace = StageTrace::new("t-1");
        trace.push(StageEvent::new(Stage::SpinStart, 0.0).with_spin(1));
        trace.push(StageEvent::new(Stage::ReelSpinStart { reel_index: 0 }, 100.0).with_spin(1));
        trace.push(StageEvent::new(Stage::ReelSpinStop { reel_index: 0 }, 600.0).with_spin(1));
        trace.push(StageEvent::new(Stage::SpinEnd, 1200.0).with_spin(1));
        // settle may land after the spin already ended
        trace.push(StageEvent::new(Stage::ReelSettled { reel_index: 0 }, 1300.0).with_spin(1));
        trace
    }

    #[test]
    fn test_trace_queries() {
        let trace = spin_trace();
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.count("reel_spin_start"), 1);
        assert_eq!(trace.duration_ms(), 1300.0);
        assert_eq!(trace.by_category(StageCategory::Reels).count(), 3);
        assert!(trace.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_stop_before_start() {
        let mut trace = StageTrace::new("bad");
        trace.push(StageEvent::new(Stage::SpinStart, 0.0).with_spin(1));
        trace.push(StageEvent::new(Stage::ReelSpinStop { reel_index: 2 }, 10.0).with_spin(1));
        assert!(trace.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_settle_without_release() {
        let mut trace = spin_trace();
        // reel 1 was never started or released in spin 1
        trace.push(StageEvent::new(Stage::ReelSettled { reel_index: 1 }, 1400.0).with_spin(1));
        assert!(trace.validate().is_err());

        let mut trace = StageTrace::new("late");
        trace.push(StageEvent::new(Stage::SpinStart, 0.0).with_spin(2));
        trace.push(StageEvent::new(Stage::ReelStop { reel_index: 3 }, 5.0).with_spin(2));
        trace.push(StageEvent::new(Stage::ReelSpinStart { reel_index: 3 }, 100.0).with_spin(2));
        assert!(trace.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_profile() {
        let trace = spin_trace().with_profile(TimingProfile::Turbo);
        let json = trace.to_json().unwrap();
        let back = StageTrace::from_json(&json).unwrap();
        assert_eq!(back.timing_profile, Some(TimingProfile::Turbo));
        assert_eq!(back, trace);
    }
}

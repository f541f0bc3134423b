//! Stage — The enum defining every phase of a spin
//!
//! A Stage is NOT an animation, NOT a reel state.
//! A Stage is the SEMANTIC MEANING of a moment in the spin flow.

use serde::{Deserialize, Serialize};

/// Canonical spin stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted, button locked
    SpinStart,

    /// Win outcome resolved (before any reel stops)
    OutcomeDecided {
        /// Whether this spin will be celebrated as a win
        will_win: bool,
    },

    /// Single reel starts spinning
    ReelSpinStart {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Every reel has been started and the hold period elapsed
    AllReelsSpinning,

    /// Single reel released; it now decays towards rest
    ReelSpinStop {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Reel speed reached zero, snap-to-grid begins
    ReelStop {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Snap-to-grid finished, symbols aligned
    ReelSettled {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Stop sequence (including trailing pause) complete
    AllReelsStopped,

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Win celebration starting
    WinPresent {
        /// Whether a win animation is actually shown
        #[serde(default)]
        animated: bool,
    },

    /// Win celebration finished
    WinPresentEnd,

    /// Spin complete, ready for next spin
    SpinEnd,
}

impl Stage {
    /// Get the stage type name (snake_case, matches serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart => "spin_start",
            Stage::OutcomeDecided { .. } => "outcome_decided",
            Stage::ReelSpinStart { .. } => "reel_spin_start",
            Stage::AllReelsSpinning => "all_reels_spinning",
            Stage::ReelSpinStop { .. } => "reel_spin_stop",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::ReelSettled { .. } => "reel_settled",
            Stage::AllReelsStopped => "all_reels_stopped",
            Stage::WinPresent { .. } => "win_present",
            Stage::WinPresentEnd => "win_present_end",
            Stage::SpinEnd => "spin_end",
        }
    }

    /// Get reel index if this is a per-reel stage
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelSpinStart { reel_index }
            | Stage::ReelSpinStop { reel_index }
            | Stage::ReelStop { reel_index }
            | Stage::ReelSettled { reel_index } => Some(*reel_index),
            _ => None,
        }
    }

    /// Get the category of this stage
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart | Stage::OutcomeDecided { .. } | Stage::SpinEnd => {
                StageCategory::SpinLifecycle
            }
            Stage::ReelSpinStart { .. }
            | Stage::AllReelsSpinning
            | Stage::ReelSpinStop { .. }
            | Stage::ReelStop { .. }
            | Stage::ReelSettled { .. }
            | Stage::AllReelsStopped => StageCategory::Reels,
            Stage::WinPresent { .. } | Stage::WinPresentEnd => StageCategory::WinLifecycle,
        }
    }

    /// Stages that mark the start of a sound-worthy moment
    pub fn is_audible(&self) -> bool {
        matches!(
            self,
            Stage::SpinStart
                | Stage::ReelSpinStart { .. }
                | Stage::ReelStop { .. }
                | Stage::WinPresent { .. }
        )
    }
}

/// Stage categories for filtering and routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    Reels,
    WinLifecycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_matches_serde_tag() {
        let stages = [
            Stage::SpinStart,
            Stage::OutcomeDecided { will_win: true },
            Stage::ReelSpinStart { reel_index: 2 },
            Stage::ReelSettled { reel_index: 1 },
            Stage::WinPresent { animated: false },
            Stage::SpinEnd,
        ];
        for stage in stages {
            let json = serde_json::to_value(&stage).unwrap();
            assert_eq!(json["type"], stage.type_name());
        }
    }

    #[test]
    fn test_reel_index_and_category() {
        assert_eq!(Stage::ReelStop { reel_index: 3 }.reel_index(), Some(3));
        assert_eq!(Stage::SpinEnd.reel_index(), None);
        assert_eq!(Stage::AllReelsStopped.category(), StageCategory::Reels);
        assert_eq!(
            Stage::WinPresentEnd.category(),
            StageCategory::WinLifecycle
        );
    }
}

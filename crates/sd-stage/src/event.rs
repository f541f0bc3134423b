//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with timing and spin identity.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Machine clock in milliseconds (virtual time since construction)
    pub timestamp_ms: f64,

    /// Spin counter, 1-based; 0 outside of any spin
    #[serde(default)]
    pub spin_index: u64,

    /// Custom tags for filtering/routing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StageEvent {
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            spin_index: 0,
            tags: Vec::new(),
        }
    }

    pub fn with_spin(mut self, spin_index: u64) -> Self {
        self.spin_index = spin_index;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let event = StageEvent::new(Stage::ReelStop { reel_index: 1 }, 512.0)
            .with_spin(3)
            .with_tag("reel");
        assert_eq!(event.type_name(), "reel_stop");
        assert_eq!(event.spin_index, 3);
        assert_eq!(event.tags, vec!["reel".to_string()]);
    }

    #[test]
    fn test_json_omits_empty_tags() {
        let event = StageEvent::new(Stage::SpinStart, 0.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("tags"));
        let back: StageEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

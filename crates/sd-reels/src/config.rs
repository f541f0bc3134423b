//! Machine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use sd_core::Ease;
use sd_stage::{TimingConfig, TimingProfile};

use crate::error::{ConfigError, ConfigResult};

/// Sound aliases the machine plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundAliases {
    /// Looping sound, one copy per spinning reel
    pub reel_spin: String,
    /// One-shot played on a winning spin
    pub win: String,
}

impl Default for SoundAliases {
    fn default() -> Self {
        Self {
            reel_spin: "Reel spin".into(),
            win: "win".into(),
        }
    }
}

/// A skeletal animation placed on the machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationSpec {
    /// Skeleton data file
    pub file: String,
    /// Clip to play
    pub clip: String,
}

impl DecorationSpec {
    pub fn new(file: impl Into<String>, clip: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            clip: clip.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decorations {
    /// Looping frame around the reels; `None` disables it
    pub frame: Option<DecorationSpec>,
    /// One-shot celebration on a win; `None` disables it
    pub win: Option<DecorationSpec>,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            frame: Some(DecorationSpec::new("base-feature-frame.json", "idle")),
            win: Some(DecorationSpec::new("big-boom-h.json", "start")),
        }
    }
}

/// Complete reel machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of reels, stacked vertically
    pub reel_count: usize,

    /// Visible symbols per reel (one extra is kept for wrap)
    pub symbols_per_reel: usize,

    /// Symbol edge length in pixels
    pub symbol_size: f64,

    /// Vertical gap between reels in pixels
    pub reel_spacing: f64,

    /// Scroll speed while spinning (px/frame)
    pub spin_speed: f64,

    /// Per-frame speed multiplier once released
    pub decay_rate: f64,

    /// Speed below which a released reel snaps to rest (px/frame)
    pub stop_threshold: f64,

    /// Blur at full speed
    pub max_blur: f64,

    /// Snap-to-grid tween length
    pub settle_duration_ms: f64,

    /// Snap-to-grid easing
    pub settle_ease: Ease,

    /// Chance a spin is celebrated as a win
    pub win_probability: f64,

    /// Texture names symbols are drawn from
    pub symbol_textures: Vec<String>,

    pub sounds: SoundAliases,

    pub decorations: Decorations,

    pub timing: TimingConfig,

    /// RNG seed; unset means the caller supplies one
    pub seed: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            reel_count: 4,
            symbols_per_reel: 6,
            symbol_size: 150.0,
            reel_spacing: 10.0,
            spin_speed: 50.0,
            decay_rate: 0.9,
            stop_threshold: 0.5,
            max_blur: 20.0,
            settle_duration_ms: 200.0,
            settle_ease: Ease::BackOut,
            win_probability: 0.3,
            symbol_textures: (1..=5).map(|i| format!("symbol{i}.png")).collect(),
            sounds: SoundAliases::default(),
            decorations: Decorations::default(),
            timing: TimingConfig::normal(),
            seed: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace timing with a named profile
    pub fn with_profile_name(mut self, name: &str) -> ConfigResult<Self> {
        let profile = TimingProfile::from_name(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        self.timing = TimingConfig::from_profile(profile);
        Ok(self)
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Symbols per reel including the wrap symbol
    pub fn strip_len(&self) -> usize {
        self.symbols_per_reel + 1
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.reel_count == 0 || self.reel_count > u8::MAX as usize {
            return Err(ConfigError::invalid(
                "reel_count",
                format!("{} not in 1..=255", self.reel_count),
            ));
        }
        if self.symbols_per_reel == 0 {
            return Err(ConfigError::invalid("symbols_per_reel", "must be at least 1"));
        }
        if !(self.symbol_size > 0.0) {
            return Err(ConfigError::invalid("symbol_size", "must be positive"));
        }
        if !(self.reel_spacing >= 0.0) {
            return Err(ConfigError::invalid("reel_spacing", "must not be negative"));
        }
        if !(self.spin_speed > 0.0) {
            return Err(ConfigError::invalid("spin_speed", "must be positive"));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate < 1.0) {
            return Err(ConfigError::invalid(
                "decay_rate",
                format!("{} not in (0, 1)", self.decay_rate),
            ));
        }
        if !(self.stop_threshold > 0.0 && self.stop_threshold < self.spin_speed) {
            return Err(ConfigError::invalid(
                "stop_threshold",
                "must be positive and below spin_speed",
            ));
        }
        if !(self.max_blur >= 0.0) {
            return Err(ConfigError::invalid("max_blur", "must not be negative"));
        }
        if !(self.settle_duration_ms >= 0.0) {
            return Err(ConfigError::invalid(
                "settle_duration_ms",
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.win_probability) {
            return Err(ConfigError::invalid(
                "win_probability",
                format!("{} not in [0, 1]", self.win_probability),
            ));
        }
        if self.symbol_textures.is_empty() {
            return Err(ConfigError::invalid("symbol_textures", "must not be empty"));
        }

        let t = &self.timing;
        let delays = [
            t.reel_start_interval_ms,
            t.start_hold_per_reel_ms,
            t.reel_stop_delay_min_ms,
            t.reel_stop_delay_max_ms,
            t.stop_tail_ms,
        ];
        if delays.iter().any(|d| !(*d >= 0.0)) {
            return Err(ConfigError::invalid("timing", "delays must not be negative"));
        }
        if t.reel_stop_delay_max_ms < t.reel_stop_delay_min_ms {
            return Err(ConfigError::invalid(
                "timing",
                "reel_stop_delay_max_ms below reel_stop_delay_min_ms",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strip_len(), 7);
        assert_eq!(config.symbol_textures[4], "symbol5.png");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MachineConfig::from_json_str(r#"{ "reel_count": 3, "win_probability": 1.0 }"#)
            .unwrap();
        assert_eq!(config.reel_count, 3);
        assert_eq!(config.symbols_per_reel, 6);
        assert_eq!(config.sounds.reel_spin, "Reel spin");
    }

    #[test]
    fn test_yaml() {
        let yaml = "reel_count: 5\ntiming:\n  profile: turbo\n  stop_tail_ms: 100\ndecorations:\n  frame: null\n";
        let config = MachineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.reel_count, 5);
        assert_eq!(config.timing.profile, TimingProfile::Turbo);
        assert_eq!(config.timing.stop_tail_ms, 100.0);
        assert_eq!(config.timing.reel_start_interval_ms, 100.0);
        assert!(config.decorations.frame.is_none());
        assert!(config.decorations.win.is_some());
    }

    #[test]
    fn test_validation_errors() {
        let bad = [
            r#"{ "reel_count": 0 }"#,
            r#"{ "decay_rate": 1.0 }"#,
            r#"{ "win_probability": 1.5 }"#,
            r#"{ "symbol_textures": [] }"#,
            r#"{ "timing": { "reel_stop_delay_min_ms": 800 } }"#,
        ];
        for json in bad {
            assert!(
                matches!(
                    MachineConfig::from_json_str(json),
                    Err(ConfigError::Invalid { .. })
                ),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_nan_values_are_rejected() {
        let cases: [fn(&mut MachineConfig); 3] = [
            |c| c.max_blur = f64::NAN,
            |c| c.settle_duration_ms = f64::NAN,
            |c| c.reel_spacing = f64::NAN,
        ];
        for set in cases {
            let mut config = MachineConfig::default();
            set(&mut config);
            assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
        }
    }

    #[test]
    fn test_profile_by_name() {
        let config = MachineConfig::default().with_profile_name("instant").unwrap();
        assert_eq!(config.timing, TimingConfig::instant());
        assert!(matches!(
            MachineConfig::default().with_profile_name("warp"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }
}

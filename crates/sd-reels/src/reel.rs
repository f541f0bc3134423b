//! Reel — one horizontally scrolling row of symbols
//!
//! Motion model, per frame:
//! - spinning: constant `spin_speed`
//! - released: `speed *= decay_rate` until below `stop_threshold`, then 0
//! - at rest: symbols tween back onto the grid (Back ease-out)
//!
//! Blur follows speed while enabled and is switched off when the settle begins.

use rand::SeedableRng;
use rand::rngs::StdRng;

use sd_core::{Ease, Tween, frames_to_ms};
use sd_media::{SharedAudio, SoundInstance};

use crate::config::MachineConfig;
use crate::symbols::{Symbol, SymbolStrip};

/// Motion constants of a reel
#[derive(Debug, Clone, PartialEq)]
pub struct ReelParams {
    pub symbol_count: usize,
    pub symbol_size: f64,
    pub spin_speed: f64,
    pub decay_rate: f64,
    pub stop_threshold: f64,
    pub max_blur: f64,
    pub settle_duration_ms: f64,
    pub settle_ease: Ease,
    pub texture_count: usize,
    pub spin_sound: String,
}

impl From<&MachineConfig> for ReelParams {
    fn from(config: &MachineConfig) -> Self {
        Self {
            symbol_count: config.symbols_per_reel,
            symbol_size: config.symbol_size,
            spin_speed: config.spin_speed,
            decay_rate: config.decay_rate,
            stop_threshold: config.stop_threshold,
            max_blur: config.max_blur,
            settle_duration_ms: config.settle_duration_ms,
            settle_ease: config.settle_ease,
            texture_count: config.symbol_textures.len(),
            spin_sound: config.sounds.reel_spin.clone(),
        }
    }
}

impl Default for ReelParams {
    fn default() -> Self {
        Self::from(&MachineConfig::default())
    }
}

/// Reported by [`Reel::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelEvent {
    /// Speed dropped below the threshold and snapped to zero
    Stopped,
    /// Snap-to-grid tween finished
    Settled,
}

pub struct Reel {
    params: ReelParams,
    strip: SymbolStrip,
    speed: f64,
    spinning: bool,
    blur: f64,
    blur_enabled: bool,
    settle: Option<Vec<Tween>>,
    y: f64,
    audio: Option<SharedAudio>,
    spin_sound: Option<Box<dyn SoundInstance>>,
    rng: StdRng,
}

impl Reel {
    /// Silent reel with `params.symbol_count + 1` symbols
    pub fn new(params: ReelParams, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let strip = SymbolStrip::new(
            params.symbol_count + 1,
            params.symbol_size,
            params.texture_count,
            &mut rng,
        );
        Self {
            params,
            strip,
            speed: 0.0,
            spinning: false,
            blur: 0.0,
            blur_enabled: false,
            settle: None,
            y: 0.0,
            audio: None,
            spin_sound: None,
            rng,
        }
    }

    /// Attach the audio service used for the spin loop
    pub fn with_audio(mut self, audio: SharedAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn start_spin(&mut self) {
        if self.spin_sound.is_none() {
            self.spin_sound = self
                .audio
                .as_ref()
                .and_then(|audio| audio.copy(&self.params.spin_sound));
        }
        if let Some(sound) = self.spin_sound.as_mut() {
            sound.play();
        }
        // a restart during the settle wins over the tween
        self.settle = None;
        self.spinning = true;
        self.speed = self.params.spin_speed;
        self.blur_enabled = true;
    }

    /// Release the reel; it keeps moving until its speed decays
    pub fn stop_spin(&mut self) {
        if let Some(mut sound) = self.spin_sound.take() {
            sound.stop();
        }
        self.spinning = false;
    }

    pub fn update(&mut self, delta_frames: f64) -> Option<ReelEvent> {
        if let Some(tweens) = self.settle.as_mut() {
            let elapsed_ms = frames_to_ms(delta_frames);
            let mut finished = true;
            for (i, tween) in tweens.iter_mut().enumerate() {
                let x = tween.advance(elapsed_ms);
                finished &= tween.is_finished();
                self.strip.set_x(i, x);
            }
            if finished {
                self.settle = None;
                return Some(ReelEvent::Settled);
            }
            return None;
        }

        if !self.spinning && self.speed == 0.0 {
            return None;
        }

        self.strip.shift(-self.speed * delta_frames);
        self.strip.recycle(&mut self.rng);

        if self.blur_enabled {
            self.blur = (self.speed / self.params.spin_speed * self.params.max_blur)
                .min(self.params.max_blur);
        }

        if !self.spinning && self.speed > 0.0 {
            self.speed *= self.params.decay_rate.powf(delta_frames);
            if self.speed < self.params.stop_threshold {
                self.speed = 0.0;
                self.snap_to_grid();
                return Some(ReelEvent::Stopped);
            }
        }
        None
    }

    fn snap_to_grid(&mut self) {
        self.blur_enabled = false;
        self.blur = 0.0;
        self.strip.sort_by_x();
        let tweens = self
            .strip
            .symbols()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Tween::new(
                    s.x,
                    self.strip.grid_x(i),
                    self.params.settle_duration_ms,
                    self.params.settle_ease,
                )
            })
            .collect();
        self.settle = Some(tweens);
    }

    #[inline]
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current blur; zero while blur is disabled
    pub fn blur(&self) -> f64 {
        if self.blur_enabled { self.blur } else { 0.0 }
    }

    pub fn is_blur_enabled(&self) -> bool {
        self.blur_enabled
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Not spinning, zero speed and no settle pending
    pub fn is_at_rest(&self) -> bool {
        !self.spinning && self.speed == 0.0 && self.settle.is_none()
    }

    pub fn symbols(&self) -> &[Symbol] {
        self.strip.symbols()
    }

    pub fn strip(&self) -> &SymbolStrip {
        &self.strip
    }

    pub fn params(&self) -> &ReelParams {
        &self.params
    }

    /// Visible height of the reel
    pub fn height(&self) -> f64 {
        self.params.symbol_size
    }

    /// Visible width (without the wrap symbol)
    pub fn width(&self) -> f64 {
        self.params.symbol_size * self.params.symbol_count as f64
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }
}

impl std::fmt::Debug for Reel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reel")
            .field("speed", &self.speed)
            .field("spinning", &self.spinning)
            .field("blur", &self.blur())
            .field("settling", &self.is_settling())
            .field("y", &self.y)
            .finish()
    }
}

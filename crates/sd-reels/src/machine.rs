//! SlotMachine — spin lifecycle orchestration
//!
//! ```text
//! Idle ──spin()──► Starting ──start seq done──► Stopping ──stop seq done──┐
//!  ▲                                                                      │
//!  ├──────────────────────────── lose ───────────────────────────────────┤
//!  │                                                                      ▼
//!  └──────────── win clip complete ◄──── Celebrating ◄──── win ───────────┘
//! ```
//!
//! `on_reel_started` fires inside `spin()`, before any reel moves;
//! `on_reel_finished` fires once every reel is released and the celebration,
//! if any, is over.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use sd_core::{Signal, Size, frames_to_ms};
use sd_media::{AnimationEvent, AssetProvider, SharedAudio, SkeletalAnimation, SoundOptions};
use sd_stage::{Stage, StageEvent, StageTrace};

use crate::config::{DecorationSpec, MachineConfig};
use crate::error::ConfigResult;
use crate::layout::MachineLayout;
use crate::reel::{Reel, ReelEvent, ReelParams};
use crate::reel_group::{GroupEvent, ReelGroup, SequenceKind};

/// Seed used when neither the config nor the caller provides one
pub const DEFAULT_SEED: u64 = 0x5EED_D3C4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachinePhase {
    #[default]
    Idle,
    /// Reels starting one by one
    Starting,
    /// Reels being released one by one
    Stopping,
    /// Win animation running
    Celebrating,
}

impl MachinePhase {
    /// Starting or stopping
    pub fn is_spinning(&self) -> bool {
        matches!(self, Self::Starting | Self::Stopping)
    }
}

pub struct SlotMachine {
    config: MachineConfig,
    layout: MachineLayout,
    group: ReelGroup,
    audio: SharedAudio,
    frame_animation: Option<SkeletalAnimation>,
    win_animation: Option<SkeletalAnimation>,
    phase: MachinePhase,
    spinning: bool,
    will_win: bool,
    last_outcome: Option<bool>,
    spin_count: u64,
    /// Spin that released each reel; its trailing motion events belong there
    released_in: Vec<u64>,
    win_count: u64,
    clock_ms: f64,
    trace: Option<StageTrace>,
    rng: StdRng,

    /// Fired when a spin is accepted
    pub on_reel_started: Signal<()>,
    /// Fired when a spin (including its celebration) is over
    pub on_reel_finished: Signal<()>,
    /// Every lifecycle stage, timestamped on the machine clock
    pub on_stage: Signal<StageEvent>,
}

impl SlotMachine {
    /// Build a machine seeded from `config.seed` (or [`DEFAULT_SEED`])
    pub fn new(
        config: MachineConfig,
        screen: Size,
        audio: SharedAudio,
        assets: &dyn AssetProvider,
    ) -> ConfigResult<Self> {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_seed(config, screen, audio, assets, seed)
    }

    pub fn with_seed(
        config: MachineConfig,
        screen: Size,
        audio: SharedAudio,
        assets: &dyn AssetProvider,
        seed: u64,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let layout = MachineLayout::new(&config, screen);
        let mut group = ReelGroup::new(
            config.reel_spacing,
            Some(layout.panel),
            config.timing.clone(),
            rng.random(),
        );
        let params = ReelParams::from(&config);
        for _ in 0..config.reel_count {
            group.add_reel(Reel::new(params.clone(), rng.random()).with_audio(audio.clone()));
        }

        for texture in &config.symbol_textures {
            if !assets.has_texture(texture) {
                log::warn!("[SlotMachine] symbol texture missing: {}", texture);
            }
        }

        let mut frame_animation = config
            .decorations
            .frame
            .as_ref()
            .and_then(|spec| load_decoration(assets, spec, &layout));
        if let (Some(anim), Some(spec)) = (frame_animation.as_mut(), &config.decorations.frame) {
            anim.set_visible(true);
            if let Err(e) = anim.play(&spec.clip, true) {
                log::warn!("[SlotMachine] {}", e);
            }
        }

        let mut win_animation = config
            .decorations
            .win
            .as_ref()
            .and_then(|spec| load_decoration(assets, spec, &layout));
        if let Some(anim) = win_animation.as_mut() {
            anim.set_visible(false);
        }

        log::info!(
            "[SlotMachine] {} reels × {} symbols, timing {}, seed {}",
            config.reel_count,
            config.symbols_per_reel,
            config.timing.profile.display_name(),
            seed
        );

        let released_in = vec![0; group.len()];
        Ok(Self {
            config,
            layout,
            group,
            audio,
            frame_animation,
            win_animation,
            phase: MachinePhase::Idle,
            spinning: false,
            will_win: false,
            last_outcome: None,
            spin_count: 0,
            released_in,
            win_count: 0,
            clock_ms: 0.0,
            trace: None,
            rng,
            on_reel_started: Signal::new(),
            on_reel_finished: Signal::new(),
            on_stage: Signal::new(),
        })
    }

    /// Start a spin. Returns false (and does nothing) unless idle.
    pub fn spin(&mut self) -> bool {
        if self.phase != MachinePhase::Idle {
            log::debug!("[SlotMachine] spin ignored in {:?}", self.phase);
            return false;
        }

        self.spinning = true;
        self.phase = MachinePhase::Starting;
        self.spin_count += 1;
        self.publish(Stage::SpinStart);

        self.on_reel_started.dispatch();

        let will_win = self.rng.random_bool(self.config.win_probability);
        self.will_win = will_win;
        self.last_outcome = Some(will_win);
        self.publish(Stage::OutcomeDecided { will_win });

        self.group.start_spin(will_win);
        true
    }

    /// Advance by `delta_frames` (1.0 = one 60 fps frame)
    pub fn update(&mut self, delta_frames: f64) {
        let elapsed_ms = frames_to_ms(delta_frames);
        self.clock_ms += elapsed_ms;

        if let Some(frame) = self.frame_animation.as_mut() {
            frame.update(elapsed_ms);
        }
        if self.phase == MachinePhase::Celebrating {
            let completed = match self.win_animation.as_mut() {
                Some(anim) => matches!(anim.update(elapsed_ms), Some(AnimationEvent::Complete { .. })),
                None => true,
            };
            if completed {
                self.end_celebration();
            }
        }

        for event in self.group.update(delta_frames) {
            self.handle_group_event(event);
        }
    }

    fn handle_group_event(&mut self, event: GroupEvent) {
        match event {
            GroupEvent::ReelStarted(i) => self.publish(Stage::ReelSpinStart {
                reel_index: reel_index(i),
            }),
            GroupEvent::ReelReleased(i) => {
                if let Some(spin) = self.released_in.get_mut(i) {
                    *spin = self.spin_count;
                }
                self.publish(Stage::ReelSpinStop {
                    reel_index: reel_index(i),
                })
            }
            GroupEvent::Reel(i, event) => {
                let stage = match event {
                    ReelEvent::Stopped => Stage::ReelStop {
                        reel_index: reel_index(i),
                    },
                    ReelEvent::Settled => Stage::ReelSettled {
                        reel_index: reel_index(i),
                    },
                };
                let spin = self.released_in.get(i).copied().unwrap_or(self.spin_count);
                self.publish_for(stage, spin);
            }
            GroupEvent::SequenceFinished(SequenceKind::Start) => {
                self.publish(Stage::AllReelsSpinning);
                self.phase = MachinePhase::Stopping;
                self.group.stop_spin();
            }
            GroupEvent::SequenceFinished(SequenceKind::Stop) => {
                self.publish(Stage::AllReelsStopped);
                self.finish_spin();
            }
        }
    }

    fn finish_spin(&mut self) {
        self.spinning = false;

        if !self.will_win {
            self.end_spin();
            return;
        }

        self.win_count += 1;
        self.audio.play(&self.config.sounds.win, SoundOptions::default());
        log::info!("Winner!");

        let clip = self
            .config
            .decorations
            .win
            .as_ref()
            .map(|spec| spec.clip.clone());
        let animated = match (self.win_animation.as_mut(), clip) {
            (Some(anim), Some(clip)) => match anim.play(&clip, false) {
                Ok(()) => {
                    anim.set_visible(true);
                    true
                }
                Err(e) => {
                    log::warn!("[SlotMachine] {}", e);
                    false
                }
            },
            _ => false,
        };
        self.publish(Stage::WinPresent { animated });

        if animated {
            self.phase = MachinePhase::Celebrating;
        } else {
            self.publish(Stage::WinPresentEnd);
            self.end_spin();
        }
    }

    fn end_celebration(&mut self) {
        if let Some(anim) = self.win_animation.as_mut() {
            anim.set_visible(false);
        }
        self.publish(Stage::WinPresentEnd);
        self.end_spin();
    }

    fn end_spin(&mut self) {
        self.phase = MachinePhase::Idle;
        self.will_win = false;
        self.publish(Stage::SpinEnd);
        self.on_reel_finished.dispatch();
    }

    fn publish(&mut self, stage: Stage) {
        self.publish_for(stage, self.spin_count);
    }

    fn publish_for(&mut self, stage: Stage, spin_index: u64) {
        let event = StageEvent::new(stage, self.clock_ms).with_spin(spin_index);
        log::debug!(
            "[SlotMachine] {} @ {:.1}ms (spin {})",
            event.type_name(),
            event.timestamp_ms,
            event.spin_index
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event.clone());
        }
        self.on_stage.emit(&event);
    }

    /// Start recording stage events into a fresh trace
    pub fn record_trace(&mut self, trace_id: impl Into<String>) {
        self.trace = Some(StageTrace::new(trace_id).with_profile(self.config.timing.profile));
    }

    /// Stop recording and return what was recorded
    pub fn take_trace(&mut self) -> Option<StageTrace> {
        self.trace.take()
    }

    pub fn trace(&self) -> Option<&StageTrace> {
        self.trace.as_ref()
    }

    /// True between `spin()` and the end of the stop sequence
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// True whenever a new spin would be rejected
    pub fn is_busy(&self) -> bool {
        self.phase != MachinePhase::Idle
    }

    pub fn phase(&self) -> MachinePhase {
        self.phase
    }

    /// Outcome of the most recent spin
    pub fn last_outcome(&self) -> Option<bool> {
        self.last_outcome
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn win_count(&self) -> u64 {
        self.win_count
    }

    /// Machine clock in ms
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn reel_group(&self) -> &ReelGroup {
        &self.group
    }

    pub fn layout(&self) -> &MachineLayout {
        &self.layout
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn frame_animation(&self) -> Option<&SkeletalAnimation> {
        self.frame_animation.as_ref()
    }

    pub fn win_animation(&self) -> Option<&SkeletalAnimation> {
        self.win_animation.as_ref()
    }

    /// Texture name for a symbol texture index
    pub fn texture_name(&self, texture: usize) -> Option<&str> {
        self.config.symbol_textures.get(texture).map(String::as_str)
    }
}

impl std::fmt::Debug for SlotMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotMachine")
            .field("phase", &self.phase)
            .field("spinning", &self.spinning)
            .field("spin_count", &self.spin_count)
            .field("clock_ms", &self.clock_ms)
            .field("group", &self.group)
            .finish()
    }
}

fn load_decoration(
    assets: &dyn AssetProvider,
    spec: &DecorationSpec,
    layout: &MachineLayout,
) -> Option<SkeletalAnimation> {
    match SkeletalAnimation::load(assets, &spec.file) {
        Ok(mut anim) => {
            anim.set_position(layout.decoration_anchor);
            Some(anim)
        }
        Err(e) => {
            log::error!("Error initializing spine animations: {}", e);
            None
        }
    }
}

fn reel_index(i: usize) -> u8 {
    u8::try_from(i).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_media::{AssetCatalog, PlaybackKind, SoundBank};
    use sd_stage::TimingConfig;
    use std::cell::Cell;
    use std::rc::Rc;

    fn machine(win_probability: f64, timing: TimingConfig) -> (SlotMachine, Rc<SoundBank>) {
        let catalog = AssetCatalog::demo();
        let bank = Rc::new(SoundBank::new());
        catalog.register_sounds(bank.as_ref());
        let config = MachineConfig {
            win_probability,
            ..MachineConfig::default()
        }
        .with_timing(timing);
        let machine =
            SlotMachine::with_seed(config, Size::new(1280.0, 720.0), bank.clone(), &catalog, 3)
                .unwrap();
        (machine, bank)
    }

    fn run_until_idle(machine: &mut SlotMachine) -> usize {
        let mut frames = 0;
        while machine.is_busy() && frames < 10_000 {
            machine.update(1.0);
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_spin_rejected_while_busy() {
        let (mut machine, _) = machine(0.0, TimingConfig::normal());
        let started = Rc::new(Cell::new(0));
        let s = started.clone();
        machine.on_reel_started.connect(move |_| s.set(s.get() + 1));

        assert!(machine.spin());
        assert!(!machine.spin());
        machine.update(10.0);
        assert!(!machine.spin());
        assert_eq!(started.get(), 1);
        assert_eq!(machine.spin_count(), 1);
    }

    #[test]
    fn test_losing_spin_returns_to_idle() {
        let (mut machine, bank) = machine(0.0, TimingConfig::normal());
        machine.spin();
        assert_eq!(machine.phase(), MachinePhase::Starting);
        run_until_idle(&mut machine);
        assert!(!machine.is_spinning());
        assert_eq!(machine.last_outcome(), Some(false));
        assert_eq!(bank.count("win", PlaybackKind::Play), 0);
    }

    #[test]
    fn test_winning_spin_celebrates() {
        let (mut machine, bank) = machine(1.0, TimingConfig::instant());
        let finished = Rc::new(Cell::new(0));
        let f = finished.clone();
        machine.on_reel_finished.connect(move |_| f.set(f.get() + 1));

        machine.spin();
        while machine.phase() != MachinePhase::Celebrating {
            machine.update(1.0);
        }
        assert!(!machine.is_spinning());
        assert_eq!(finished.get(), 0);
        assert!(machine.win_animation().unwrap().is_visible());
        assert_eq!(bank.count("win", PlaybackKind::Play), 1);

        run_until_idle(&mut machine);
        assert_eq!(finished.get(), 1);
        assert!(!machine.win_animation().unwrap().is_visible());
        assert_eq!(machine.win_count(), 1);
    }

    #[test]
    fn test_missing_decorations_do_not_block_wins() {
        let bank = Rc::new(SoundBank::new());
        let config = MachineConfig {
            win_probability: 1.0,
            ..MachineConfig::default()
        }
        .with_timing(TimingConfig::instant());
        let mut machine = SlotMachine::with_seed(
            config,
            Size::new(800.0, 600.0),
            bank,
            &AssetCatalog::new(),
            1,
        )
        .unwrap();
        assert!(machine.frame_animation().is_none());
        assert!(machine.win_animation().is_none());

        machine.spin();
        run_until_idle(&mut machine);
        assert_eq!(machine.phase(), MachinePhase::Idle);
        assert_eq!(machine.last_outcome(), Some(true));
    }

    #[test]
    fn test_frame_decoration_loops() {
        let (mut machine, _) = machine(0.0, TimingConfig::normal());
        for _ in 0..600 {
            machine.update(1.0);
        }
        let frame = machine.frame_animation().unwrap();
        assert_eq!(frame.current_clip(), Some("idle"));
        assert!(frame.is_playing());
        assert_eq!(frame.position(), machine.layout().decoration_anchor);
    }

    #[test]
    fn test_trace_records_lifecycle() {
        let (mut machine, _) = machine(1.0, TimingConfig::turbo());
        machine.record_trace("unit");
        machine.spin();
        run_until_idle(&mut machine);

        let trace = machine.take_trace().unwrap();
        assert!(trace.validate().is_ok());
        assert_eq!(trace.events.first().map(|e| e.type_name()), Some("spin_start"));
        assert_eq!(trace.count("reel_spin_start"), 4);
        assert_eq!(trace.count("reel_spin_stop"), 4);
        assert_eq!(trace.count("win_present"), 1);
        assert_eq!(trace.count("spin_end"), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = MachineConfig {
            reel_count: 0,
            ..MachineConfig::default()
        };
        let result = SlotMachine::new(
            config,
            Size::new(800.0, 600.0),
            Rc::new(SoundBank::new()),
            &AssetCatalog::new(),
        );
        assert!(result.is_err());
    }
}

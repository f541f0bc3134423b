//! Audio service
//!
//! Three playback styles:
//! - **copies**: independent fire-and-forget instances ([`AudioService::copy`]),
//!   used where the same sound overlaps itself (one spin loop per reel)
//! - **play / play_unique**: one-shot effects, optionally refusing to overlap
//! - **music**: exclusive per alias, looping by default

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};

/// Playback options; unset fields use the per-method default
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoundOptions {
    #[serde(default, rename = "loop")]
    pub looped: Option<bool>,
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default)]
    pub rate: Option<f32>,
}

impl SoundOptions {
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = Some(looped);
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume.clamp(0.0, 1.0));
        self
    }

    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate.max(0.0));
        self
    }

    /// Resolve against a default loop flag: (loop, volume, rate)
    pub fn resolve(&self, default_loop: bool) -> (bool, f32, f32) {
        (
            self.looped.unwrap_or(default_loop),
            self.volume.unwrap_or(1.0),
            self.rate.unwrap_or(1.0),
        )
    }
}

/// An independent playable copy of a registered sound
pub trait SoundInstance {
    fn alias(&self) -> &str;
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Sound registry and playback
pub trait AudioService {
    /// Register a sound under `alias`
    fn add(&self, alias: &str, url: &str) -> MediaResult<()>;

    fn contains(&self, alias: &str) -> bool;

    /// Fresh independent copy; `None` (with a warning) if the alias is unknown
    fn copy(&self, alias: &str) -> Option<Box<dyn SoundInstance>>;

    /// Play a one-shot; returns false (with a warning) if the alias is unknown
    fn play(&self, alias: &str, options: SoundOptions) -> bool;

    /// True while a `play`ed instance of `alias` has not ended
    fn is_playing(&self, alias: &str) -> bool;

    /// Play only if no instance of `alias` is currently playing
    fn play_unique(&self, alias: &str, options: SoundOptions) -> bool {
        if self.is_playing(alias) {
            return false;
        }
        self.play(alias, options)
    }

    /// Start background music; no-op if already playing
    fn play_music(&self, alias: &str, options: SoundOptions) -> bool;

    fn stop_music(&self, alias: &str);

    fn is_music_playing(&self, alias: &str) -> bool;
}

/// Shared handle passed to every consumer
pub type SharedAudio = Rc<dyn AudioService>;

// ============================================================================
// IN-MEMORY SOUND BANK
// ============================================================================

/// What happened to a sound, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackKind {
    Play,
    CopyPlay,
    CopyStop,
    MusicStart,
    MusicStop,
}

/// One entry of the bank's playback history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    pub alias: String,
    pub kind: PlaybackKind,
    pub looped: bool,
}

#[derive(Debug, Default)]
struct BankLog {
    records: Vec<PlaybackRecord>,
    live_copies: HashMap<String, usize>,
}

type SharedLog = Rc<RefCell<BankLog>>;

#[derive(Debug, Default)]
struct BankState {
    sounds: HashMap<String, String>,
    playing: HashSet<String>,
    music: HashSet<String>,
}

/// In-memory [`AudioService`]: tracks what would be audible without producing sound.
///
/// Sounds never end on their own; call [`SoundBank::finish`] to simulate the
/// end event of a one-shot.
#[derive(Debug, Default)]
pub struct SoundBank {
    state: RefCell<BankState>,
    log: SharedLog,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank with the given aliases pre-registered
    pub fn with_sounds<'a>(sounds: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let bank = Self::new();
        {
            let mut state = bank.state.borrow_mut();
            for (alias, url) in sounds {
                state.sounds.insert(alias.to_string(), url.to_string());
            }
        }
        bank
    }

    /// Simulate the end event of a played one-shot or music track
    pub fn finish(&self, alias: &str) {
        let mut state = self.state.borrow_mut();
        state.playing.remove(alias);
        state.music.remove(alias);
    }

    pub fn history(&self) -> Vec<PlaybackRecord> {
        self.log.borrow().records.clone()
    }

    /// Number of history entries of `kind` for `alias`
    pub fn count(&self, alias: &str, kind: PlaybackKind) -> usize {
        self.log
            .borrow()
            .records
            .iter()
            .filter(|r| r.alias == alias && r.kind == kind)
            .count()
    }

    /// Copies of `alias` currently playing
    pub fn live_copies(&self, alias: &str) -> usize {
        self.log
            .borrow()
            .live_copies
            .get(alias)
            .copied()
            .unwrap_or(0)
    }

    pub fn url(&self, alias: &str) -> Option<String> {
        self.state.borrow().sounds.get(alias).cloned()
    }

    fn record(&self, alias: &str, kind: PlaybackKind, looped: bool) {
        self.log.borrow_mut().records.push(PlaybackRecord {
            alias: alias.to_string(),
            kind,
            looped,
        });
    }
}

impl AudioService for SoundBank {
    fn add(&self, alias: &str, url: &str) -> MediaResult<()> {
        if url.is_empty() {
            return Err(MediaError::SoundLoadFailed {
                alias: alias.to_string(),
                url: url.to_string(),
                reason: "empty source".into(),
            });
        }
        self.state
            .borrow_mut()
            .sounds
            .insert(alias.to_string(), url.to_string());
        log::debug!("[SoundBank] Sound added: {} from {}", alias, url);
        Ok(())
    }

    fn contains(&self, alias: &str) -> bool {
        self.state.borrow().sounds.contains_key(alias)
    }

    fn copy(&self, alias: &str) -> Option<Box<dyn SoundInstance>> {
        if !self.contains(alias) {
            log::warn!("Sound not found: {}", alias);
            return None;
        }
        Some(Box::new(BankCopy {
            alias: alias.to_string(),
            playing: false,
            log: self.log.clone(),
        }))
    }

    fn play(&self, alias: &str, options: SoundOptions) -> bool {
        if !self.contains(alias) {
            log::warn!("Sound not found: {}", alias);
            return false;
        }
        let (looped, _, _) = options.resolve(false);
        self.state.borrow_mut().playing.insert(alias.to_string());
        self.record(alias, PlaybackKind::Play, looped);
        true
    }

    fn is_playing(&self, alias: &str) -> bool {
        self.state.borrow().playing.contains(alias)
    }

    fn play_music(&self, alias: &str, options: SoundOptions) -> bool {
        if !self.contains(alias) {
            log::warn!("Music not found: {}", alias);
            return false;
        }
        if self.is_music_playing(alias) {
            return false;
        }
        let (looped, _, _) = options.resolve(true);
        self.state.borrow_mut().music.insert(alias.to_string());
        self.record(alias, PlaybackKind::MusicStart, looped);
        log::info!("Playing music: {}", alias);
        true
    }

    fn stop_music(&self, alias: &str) {
        if !self.contains(alias) {
            return;
        }
        self.state.borrow_mut().music.remove(alias);
        self.record(alias, PlaybackKind::MusicStop, false);
        log::info!("Stopped music: {}", alias);
    }

    fn is_music_playing(&self, alias: &str) -> bool {
        self.state.borrow().music.contains(alias)
    }
}

/// Copy handed out by [`SoundBank::copy`]
struct BankCopy {
    alias: String,
    playing: bool,
    log: SharedLog,
}

impl BankCopy {
    fn push(&self, kind: PlaybackKind) {
        let mut log = self.log.borrow_mut();
        log.records.push(PlaybackRecord {
            alias: self.alias.clone(),
            kind,
            looped: false,
        });
        let live = log.live_copies.entry(self.alias.clone()).or_default();
        match kind {
            PlaybackKind::CopyPlay => *live += 1,
            PlaybackKind::CopyStop => *live = live.saturating_sub(1),
            _ => {}
        }
    }
}

impl SoundInstance for BankCopy {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.push(PlaybackKind::CopyPlay);
        }
    }

    fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            self.push(PlaybackKind::CopyStop);
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> SoundBank {
        SoundBank::with_sounds([("win", "sounds/win.mp3"), ("music", "sounds/bg.mp3")])
    }

    #[test]
    fn test_missing_sound_is_skipped() {
        let bank = bank();
        assert!(!bank.play("nope", SoundOptions::default()));
        assert!(bank.copy("nope").is_none());
        assert!(bank.history().is_empty());
    }

    #[test]
    fn test_play_unique_refuses_overlap() {
        let bank = bank();
        assert!(bank.play_unique("win", SoundOptions::default()));
        assert!(!bank.play_unique("win", SoundOptions::default()));
        bank.finish("win");
        assert!(bank.play_unique("win", SoundOptions::default()));
        assert_eq!(bank.count("win", PlaybackKind::Play), 2);
    }

    #[test]
    fn test_music_is_exclusive_and_loops_by_default() {
        let bank = bank();
        assert!(bank.play_music("music", SoundOptions::default()));
        assert!(!bank.play_music("music", SoundOptions::default()));
        assert!(bank.history()[0].looped);
        bank.stop_music("music");
        assert!(!bank.is_music_playing("music"));
    }

    #[test]
    fn test_copies_are_independent() {
        let bank = bank();
        let mut a = bank.copy("win").unwrap();
        let mut b = bank.copy("win").unwrap();
        a.play();
        b.play();
        assert_eq!(bank.live_copies("win"), 2);
        a.stop();
        a.stop();
        assert_eq!(bank.live_copies("win"), 1);
        assert!(b.is_playing());
    }

    #[test]
    fn test_add_rejects_empty_url() {
        let bank = SoundBank::new();
        assert!(bank.add("x", "").is_err());
        assert!(bank.add("x", "x.mp3").is_ok());
        assert_eq!(bank.url("x").as_deref(), Some("x.mp3"));
    }
}

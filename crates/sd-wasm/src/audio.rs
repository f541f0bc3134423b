// ============================================================================
// SPINDECK — HTML audio service
// <audio> elements behind the AudioService trait
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;

use web_sys::HtmlAudioElement;

use sd_media::{AudioService, MediaError, MediaResult, SoundInstance, SoundOptions};

/// Browser [`AudioService`]: every one-shot and copy gets its own element so
/// instances of one alias overlap freely.
#[derive(Debug, Default)]
pub struct HtmlAudioService {
    base_url: String,
    urls: RefCell<HashMap<String, String>>,
    /// Live one-shot elements per alias, pruned when they end
    playing: RefCell<HashMap<String, Vec<HtmlAudioElement>>>,
    music: RefCell<HashMap<String, HtmlAudioElement>>,
}

impl HtmlAudioService {
    /// Relative sound URLs are resolved against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        if self.base_url.is_empty() || url.contains("://") || url.starts_with('/') {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), url)
        }
    }

    fn element(&self, alias: &str) -> Option<HtmlAudioElement> {
        let url = self.urls.borrow().get(alias).cloned()?;
        match HtmlAudioElement::new_with_src(&url) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("[HtmlAudio] cannot create element for {}: {:?}", alias, e);
                None
            }
        }
    }

    fn prune(&self, alias: &str) {
        if let Some(list) = self.playing.borrow_mut().get_mut(alias) {
            list.retain(is_audible);
        }
    }
}

fn apply(element: &HtmlAudioElement, options: SoundOptions, default_loop: bool) {
    let (looped, volume, rate) = options.resolve(default_loop);
    element.set_loop(looped);
    element.set_volume(volume as f64);
    element.set_playback_rate(rate as f64);
}

fn start(element: &HtmlAudioElement) {
    // autoplay policy may reject until the first user gesture
    if let Err(e) = element.play() {
        log::debug!("[HtmlAudio] play rejected: {:?}", e);
    }
}

fn is_audible(element: &HtmlAudioElement) -> bool {
    !element.paused() && !element.ended()
}

impl AudioService for HtmlAudioService {
    fn add(&self, alias: &str, url: &str) -> MediaResult<()> {
        if url.is_empty() {
            return Err(MediaError::SoundLoadFailed {
                alias: alias.to_string(),
                url: url.to_string(),
                reason: "empty source".into(),
            });
        }
        let resolved = self.resolve_url(url);
        log::debug!("[HtmlAudio] Sound added: {} from {}", alias, resolved);
        self.urls.borrow_mut().insert(alias.to_string(), resolved);
        Ok(())
    }

    fn contains(&self, alias: &str) -> bool {
        self.urls.borrow().contains_key(alias)
    }

    fn copy(&self, alias: &str) -> Option<Box<dyn SoundInstance>> {
        if !self.contains(alias) {
            log::warn!("Sound not found: {}", alias);
            return None;
        }
        let element = self.element(alias)?;
        Some(Box::new(HtmlSoundCopy {
            alias: alias.to_string(),
            element,
        }))
    }

    fn play(&self, alias: &str, options: SoundOptions) -> bool {
        if !self.contains(alias) {
            log::warn!("Sound not found: {}", alias);
            return false;
        }
        let Some(element) = self.element(alias) else {
            return false;
        };
        apply(&element, options, false);
        start(&element);
        self.prune(alias);
        self.playing
            .borrow_mut()
            .entry(alias.to_string())
            .or_default()
            .push(element);
        true
    }

    fn is_playing(&self, alias: &str) -> bool {
        self.prune(alias);
        self.playing
            .borrow()
            .get(alias)
            .is_some_and(|list| !list.is_empty())
    }

    fn play_music(&self, alias: &str, options: SoundOptions) -> bool {
        if !self.contains(alias) {
            log::warn!("Music not found: {}", alias);
            return false;
        }
        if self.is_music_playing(alias) {
            return false;
        }
        let Some(element) = self.element(alias) else {
            return false;
        };
        apply(&element, options, true);
        start(&element);
        self.music.borrow_mut().insert(alias.to_string(), element);
        log::info!("Playing music: {}", alias);
        true
    }

    fn stop_music(&self, alias: &str) {
        if let Some(element) = self.music.borrow_mut().remove(alias) {
            let _ = element.pause();
            log::info!("Stopped music: {}", alias);
        }
    }

    fn is_music_playing(&self, alias: &str) -> bool {
        self.music.borrow().get(alias).is_some_and(is_audible)
    }
}

/// Independent copy; loops until stopped
struct HtmlSoundCopy {
    alias: String,
    element: HtmlAudioElement,
}

impl SoundInstance for HtmlSoundCopy {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn play(&mut self) {
        self.element.set_loop(true);
        start(&self.element);
    }

    fn stop(&mut self) {
        let _ = self.element.pause();
        self.element.set_current_time(0.0);
    }

    fn is_playing(&self) -> bool {
        is_audible(&self.element)
    }
}

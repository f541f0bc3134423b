//! Skeletal animation handler
//!
//! Holds the clip table of one skeleton and the playback state of a single
//! track. Mesh deformation is out of scope; the renderer only needs to know
//! which clip is active, how far along it is, and where the skeleton sits.

use std::collections::HashMap;

use sd_core::Point;

use crate::assets::AssetProvider;
use crate::error::{MediaError, MediaResult};

#[derive(Debug, Clone, PartialEq)]
struct Track {
    clip: String,
    looped: bool,
    elapsed_ms: f64,
    duration_ms: f64,
    complete: bool,
}

/// Emitted by [`SkeletalAnimation::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A non-looping clip reached its end
    Complete { clip: String },
}

#[derive(Debug, Clone)]
pub struct SkeletalAnimation {
    file: String,
    clips: HashMap<String, f64>,
    track: Option<Track>,
    visible: bool,
    position: Point,
}

impl SkeletalAnimation {
    /// Load skeleton metadata for `file` from the asset provider
    pub fn load(assets: &dyn AssetProvider, file: &str) -> MediaResult<Self> {
        let data = assets
            .skeleton(file)
            .ok_or_else(|| MediaError::SkeletonNotFound {
                file: file.to_string(),
            })?;

        log::debug!(
            "[SkeletalAnimation] loaded {} ({} clips)",
            file,
            data.clips.len()
        );

        Ok(Self {
            file: data.file,
            clips: data
                .clips
                .into_iter()
                .map(|c| (c.name, c.duration_ms.max(0.0)))
                .collect(),
            track: None,
            visible: true,
            position: Point::ZERO,
        })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Clip names, sorted
    pub fn animations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Start `name` on the track, replacing whatever was playing.
    ///
    /// A looped clip never completes; a one-shot reports
    /// [`AnimationEvent::Complete`] from `update` once its duration elapsed.
    pub fn play(&mut self, name: &str, looped: bool) -> MediaResult<()> {
        let duration_ms = *self
            .clips
            .get(name)
            .ok_or_else(|| MediaError::ClipNotFound {
                file: self.file.clone(),
                clip: name.to_string(),
            })?;

        self.track = Some(Track {
            clip: name.to_string(),
            looped,
            elapsed_ms: 0.0,
            duration_ms,
            complete: false,
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        self.track = None;
    }

    pub fn update(&mut self, elapsed_ms: f64) -> Option<AnimationEvent> {
        let track = self.track.as_mut()?;
        if track.complete {
            return None;
        }
        track.elapsed_ms += elapsed_ms.max(0.0);

        if track.looped {
            if track.duration_ms > 0.0 {
                track.elapsed_ms %= track.duration_ms;
            }
            return None;
        }

        if track.elapsed_ms >= track.duration_ms {
            track.elapsed_ms = track.duration_ms;
            track.complete = true;
            return Some(AnimationEvent::Complete {
                clip: track.clip.clone(),
            });
        }
        None
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.clip.as_str())
    }

    /// True while a clip is active and has not completed
    pub fn is_playing(&self) -> bool {
        self.track.as_ref().is_some_and(|t| !t.complete)
    }

    pub fn is_complete(&self) -> bool {
        self.track.as_ref().is_some_and(|t| t.complete)
    }

    /// Normalized position within the current clip (0..=1)
    pub fn progress(&self) -> f64 {
        match &self.track {
            Some(t) if t.duration_ms > 0.0 => (t.elapsed_ms / t.duration_ms).clamp(0.0, 1.0),
            Some(t) if t.complete => 1.0,
            _ => 0.0,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCatalog, SkeletonData};
    use approx::assert_relative_eq;

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        catalog.add_skeleton(
            SkeletonData::new("boom.json")
                .with_clip("start", 300.0)
                .with_clip("idle", 1000.0),
        );
        catalog
    }

    #[test]
    fn test_missing_skeleton_is_an_error() {
        let err = SkeletalAnimation::load(&catalog(), "nope.json").unwrap_err();
        assert!(matches!(err, MediaError::SkeletonNotFound { .. }));
    }

    #[test]
    fn test_missing_clip_is_an_error() {
        let mut anim = SkeletalAnimation::load(&catalog(), "boom.json").unwrap();
        assert!(matches!(
            anim.play("explode", false),
            Err(MediaError::ClipNotFound { .. })
        ));
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_one_shot_completes_once() {
        let mut anim = SkeletalAnimation::load(&catalog(), "boom.json").unwrap();
        anim.play("start", false).unwrap();
        assert_eq!(anim.update(200.0), None);
        assert_relative_eq!(anim.progress(), 200.0 / 300.0);
        assert_eq!(
            anim.update(200.0),
            Some(AnimationEvent::Complete {
                clip: "start".into()
            })
        );
        assert!(anim.is_complete());
        assert_eq!(anim.update(200.0), None);
    }

    #[test]
    fn test_looped_never_completes() {
        let mut anim = SkeletalAnimation::load(&catalog(), "boom.json").unwrap();
        anim.play("idle", true).unwrap();
        for _ in 0..100 {
            assert_eq!(anim.update(250.0), None);
        }
        assert!(anim.is_playing());
        assert_eq!(anim.animations(), vec!["idle", "start"]);
    }
}

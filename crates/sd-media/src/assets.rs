//! Asset provider
//!
//! Texture sizes and skeletal clip metadata, looked up by file name. Decoding
//! the actual image/skeleton binaries is the rendering backend's concern.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use sd_core::Size;

use crate::audio::AudioService;
use crate::error::MediaResult;

/// One animation clip of a skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub duration_ms: f64,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            duration_ms,
        }
    }
}

/// Parsed skeleton metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonData {
    pub file: String,
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
    /// Bounding size of the skeleton, if known
    #[serde(default)]
    pub size: Option<Size>,
}

impl SkeletonData {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            clips: Vec::new(),
            size: None,
        }
    }

    pub fn with_clip(mut self, name: impl Into<String>, duration_ms: f64) -> Self {
        self.clips.push(AnimationClip::new(name, duration_ms));
        self
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }
}

/// Read-only asset lookup
pub trait AssetProvider {
    fn texture_size(&self, name: &str) -> Option<Size>;

    fn has_texture(&self, name: &str) -> bool {
        self.texture_size(name).is_some()
    }

    fn skeleton(&self, file: &str) -> Option<SkeletonData>;
}

pub type SharedAssets = Rc<dyn AssetProvider>;

/// Serialized form of an [`AssetCatalog`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    /// Texture name → pixel size
    pub textures: BTreeMap<String, Size>,
    /// Sound alias → URL
    pub sounds: BTreeMap<String, String>,
    pub skeletons: Vec<SkeletonData>,
}

/// In-memory [`AssetProvider`]
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    textures: HashMap<String, Size>,
    skeletons: HashMap<String, SkeletonData>,
    sounds: BTreeMap<String, String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: AssetManifest) -> Self {
        let mut catalog = Self::new();
        for (name, size) in manifest.textures {
            catalog.add_texture(name, size);
        }
        for skeleton in manifest.skeletons {
            catalog.add_skeleton(skeleton);
        }
        catalog.sounds = manifest.sounds;
        catalog
    }

    pub fn from_manifest_json(json: &str) -> MediaResult<Self> {
        let manifest: AssetManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn to_manifest(&self) -> AssetManifest {
        let mut skeletons: Vec<SkeletonData> = self.skeletons.values().cloned().collect();
        skeletons.sort_by(|a, b| a.file.cmp(&b.file));
        AssetManifest {
            textures: self
                .textures
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            sounds: self.sounds.clone(),
            skeletons,
        }
    }

    /// Asset set of the stock game: five 150×150 symbols, the spin button
    /// textures, both decorations and the two sounds.
    pub fn demo() -> Self {
        let mut catalog = Self::new();
        for i in 1..=5 {
            catalog.add_texture(format!("symbol{i}.png"), Size::new(150.0, 150.0));
        }
        for name in [
            "button_spin.png",
            "button_spin_over.png",
            "button_spin_disabled.png",
        ] {
            catalog.add_texture(name, Size::new(150.0, 80.0));
        }
        catalog.add_skeleton(SkeletonData::new("base-feature-frame.json").with_clip("idle", 2000.0));
        catalog.add_skeleton(SkeletonData::new("big-boom-h.json").with_clip("start", 1500.0));
        catalog.add_sound("Reel spin", "assets/sounds/Reel spin.webm");
        catalog.add_sound("win", "assets/sounds/win.webm");
        catalog
    }

    pub fn add_texture(&mut self, name: impl Into<String>, size: Size) {
        self.textures.insert(name.into(), size);
    }

    pub fn add_skeleton(&mut self, skeleton: SkeletonData) {
        self.skeletons.insert(skeleton.file.clone(), skeleton);
    }

    pub fn add_sound(&mut self, alias: impl Into<String>, url: impl Into<String>) {
        self.sounds.insert(alias.into(), url.into());
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sounds.iter().map(|(a, u)| (a.as_str(), u.as_str()))
    }

    /// Register every listed sound with `audio`; returns how many were added
    pub fn register_sounds(&self, audio: &dyn AudioService) -> usize {
        let mut added = 0;
        for (alias, url) in self.sounds() {
            match audio.add(alias, url) {
                Ok(()) => added += 1,
                Err(e) => log::error!("{}", e),
            }
        }
        added
    }
}

impl AssetProvider for AssetCatalog {
    fn texture_size(&self, name: &str) -> Option<Size> {
        self.textures.get(name).copied()
    }

    fn skeleton(&self, file: &str) -> Option<SkeletonData> {
        self.skeletons.get(file).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundBank;

    #[test]
    fn test_manifest_json() {
        let json = r#"{
            "textures": { "symbol1.png": { "width": 150, "height": 150 } },
            "sounds": { "win": "win.mp3" },
            "skeletons": [ { "file": "big-boom-h.json", "clips": [ { "name": "start", "duration_ms": 900 } ] } ]
        }"#;
        let catalog = AssetCatalog::from_manifest_json(json).unwrap();
        assert!(catalog.has_texture("symbol1.png"));
        assert!(!catalog.has_texture("symbol9.png"));
        let skeleton = catalog.skeleton("big-boom-h.json").unwrap();
        assert_eq!(skeleton.clip("start").map(|c| c.duration_ms), Some(900.0));
    }

    #[test]
    fn test_bad_manifest() {
        assert!(AssetCatalog::from_manifest_json("{ \"textures\": 3 }").is_err());
    }

    #[test]
    fn test_demo_registers_sounds() {
        let catalog = AssetCatalog::demo();
        let bank = SoundBank::new();
        assert_eq!(catalog.register_sounds(&bank), 2);
        assert!(bank.contains("Reel spin"));
        assert_eq!(catalog.to_manifest().skeletons.len(), 2);
    }
}

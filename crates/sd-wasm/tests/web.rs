//! Browser tests, run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use sd_core::Size;
use sd_media::{AssetCatalog, AssetProvider, AudioService, SoundOptions};
use sd_wasm::{HtmlAssets, HtmlAudioService};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_audio_registry() {
    let audio = HtmlAudioService::new("assets");
    assert!(audio.add("win", "win.mp3").is_ok());
    assert!(audio.add("empty", "").is_err());
    assert!(audio.contains("win"));
    assert!(!audio.play("missing", SoundOptions::default()));
    assert!(audio.copy("missing").is_none());
    assert!(audio.copy("win").is_some());
}

#[wasm_bindgen_test]
fn test_stop_music_without_start_is_noop() {
    let audio = HtmlAudioService::new("");
    audio.add("theme", "theme.mp3").unwrap();
    audio.stop_music("theme");
    assert!(!audio.is_music_playing("theme"));
}

#[wasm_bindgen_test]
fn test_assets_use_catalog_sizes_before_download() {
    let assets = HtmlAssets::new(AssetCatalog::demo(), "assets");
    assert_eq!(assets.texture_size("symbol1.png"), Some(Size::new(150.0, 150.0)));
    assert!(assets.preload().unwrap() > 0);
    assert!(assets.skeleton("big-boom-h.json").is_some());
}

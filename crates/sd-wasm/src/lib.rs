// ============================================================================
// SPINDECK — WASM binding
// Mounts a Game on a <canvas>, drives it from requestAnimationFrame
// ============================================================================

pub mod assets;
pub mod audio;
pub mod input;
pub mod render;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use sd_core::Size;
use sd_game::Game;
use sd_media::{AssetCatalog, SharedAssets, SharedAudio};
use sd_reels::MachineConfig;
use sd_ui::{Cursor, PointerEvent};

pub use assets::{CanvasTextMeasure, HtmlAssets};
pub use audio::HtmlAudioService;
pub use render::Renderer;

// ============================================================================
// INITIALIZATION
// ============================================================================

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("[SpinDeck WASM] Initialized");
}

// ============================================================================
// APP STATE
// ============================================================================

struct App {
    game: Game,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    cursor: Cursor,
}

impl App {
    fn pointer(&mut self, event: PointerEvent) {
        self.game.pointer(event);
        let cursor = match self.game.ui().spin_button() {
            Some(button) if matches!(event, PointerEvent::Move(p) if button.contains_global(p)) => {
                button.cursor()
            }
            _ => Cursor::Auto,
        };
        if cursor != self.cursor {
            self.cursor = cursor;
            let _ = self.canvas.style().set_property("cursor", cursor.css());
        }
    }

    fn frame(&mut self, now_ms: f64) {
        self.game.tick(now_ms);
        if let Err(e) = self.renderer.draw(&self.game) {
            log::error!("[SpinDeck WASM] draw failed: {:?}", e);
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Seed for the machine RNG from `Math.random`
fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    hi << 32 | lo
}

// ============================================================================
// JS API
// ============================================================================

/// Mount the game on `<canvas id=canvas_id>`.
///
/// `manifest_json` is an asset manifest (textures, skeletons, sounds); the
/// built-in demo catalog is used when absent. `config_json` overrides the
/// machine config. Relative asset URLs resolve against `base_url`.
#[wasm_bindgen]
pub fn start(
    canvas_id: &str,
    base_url: &str,
    manifest_json: Option<String>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{canvas_id} not found")))?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let catalog = match manifest_json {
        Some(json) => AssetCatalog::from_manifest_json(&json).map_err(js_error)?,
        None => AssetCatalog::demo(),
    };
    let config = match config_json {
        Some(json) => MachineConfig::from_json_str(&json).map_err(js_error)?,
        None => MachineConfig::default(),
    };

    let audio = Rc::new(HtmlAudioService::new(base_url));
    let registered = catalog.register_sounds(audio.as_ref());
    let assets = Rc::new(HtmlAssets::new(catalog, base_url));
    assets.preload()?;
    log::info!("[SpinDeck WASM] {} sounds registered", registered);

    let screen = Size::new(canvas.width() as f64, canvas.height() as f64);
    let seed = config.seed.unwrap_or_else(random_seed);
    let shared_audio: SharedAudio = audio;
    let shared_assets: SharedAssets = assets.clone();
    let game = Game::with_measure(
        config,
        screen,
        shared_audio,
        shared_assets,
        Rc::new(CanvasTextMeasure::new(ctx.clone())),
        seed,
    )
    .map_err(js_error)?;

    APP.with(|cell| {
        cell.replace(Some(App {
            game,
            renderer: Renderer::new(ctx, assets),
            canvas: canvas.clone(),
            cursor: Cursor::Auto,
        }))
    });

    input::attach(&canvas, |event| {
        with_app(|app| app.pointer(event));
    })?;
    start_loop();
    log::info!("[SpinDeck WASM] mounted on #{} (seed {})", canvas_id, seed);
    Ok(())
}

/// Press the spin button as a pointer would; false while it is locked
#[wasm_bindgen]
pub fn spin() -> bool {
    with_app(|app| app.game.tap_spin_button()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_spinning() -> bool {
    with_app(|app| app.game.machine().is_busy()).unwrap_or(false)
}

/// Begin recording stage events
#[wasm_bindgen]
pub fn record_trace(trace_id: &str) {
    with_app(|app| app.game.machine_mut().record_trace(trace_id));
}

/// Stop recording and return the trace as JSON
#[wasm_bindgen]
pub fn take_trace_json() -> Result<Option<String>, JsValue> {
    let trace = with_app(|app| app.game.machine_mut().take_trace()).flatten();
    trace.map(|t| t.to_json().map_err(js_error)).transpose()
}

// ============================================================================
// FRAME LOOP
// ============================================================================

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &FrameCallback) {
    let Some(w) = window() else {
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| app.frame(ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

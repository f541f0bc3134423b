// ============================================================================
// SPINDECK — Browser assets
// Image elements for catalog textures, canvas text metrics
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use sd_core::Size;
use sd_media::{AssetCatalog, AssetProvider, SkeletonData};
use sd_ui::{FontStyle, TextMeasure};

/// Line height relative to font size for multi-line labels
const LINE_HEIGHT: f64 = 1.2;

/// [`AssetProvider`] over an [`AssetCatalog`] with one `<img>` per texture.
///
/// Sizes come from the catalog so layout never waits for a download; images
/// are drawn once they report `complete`.
#[derive(Debug)]
pub struct HtmlAssets {
    catalog: AssetCatalog,
    base_url: String,
    images: RefCell<HashMap<String, HtmlImageElement>>,
}

impl HtmlAssets {
    pub fn new(catalog: AssetCatalog, base_url: impl Into<String>) -> Self {
        Self {
            catalog,
            base_url: base_url.into(),
            images: RefCell::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Start downloading every catalog texture; returns how many were requested
    pub fn preload(&self) -> Result<usize, JsValue> {
        let names: Vec<String> = self.catalog.to_manifest().textures.into_keys().collect();
        for name in &names {
            self.request(name)?;
        }
        log::info!("[HtmlAssets] preloading {} textures", names.len());
        Ok(names.len())
    }

    fn request(&self, name: &str) -> Result<(), JsValue> {
        if self.images.borrow().contains_key(name) {
            return Ok(());
        }
        let image = HtmlImageElement::new()?;
        image.set_src(&self.url(name));
        self.images.borrow_mut().insert(name.to_string(), image);
        Ok(())
    }

    fn url(&self, name: &str) -> String {
        if self.base_url.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), name)
        }
    }

    /// Decoded image for `name`, if loaded
    pub fn image(&self, name: &str) -> Option<HtmlImageElement> {
        self.images
            .borrow()
            .get(name)
            .filter(|img| img.complete() && img.natural_width() > 0)
            .cloned()
    }
}

impl AssetProvider for HtmlAssets {
    fn texture_size(&self, name: &str) -> Option<Size> {
        self.catalog.texture_size(name)
    }

    fn skeleton(&self, file: &str) -> Option<SkeletonData> {
        self.catalog.skeleton(file)
    }
}

/// [`TextMeasure`] backed by `CanvasRenderingContext2d::measureText`
#[derive(Debug, Clone)]
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn measure(&self, text: &str, style: &FontStyle, font_size: f64) -> Size {
        self.ctx.save();
        self.ctx.set_font(&style.css_font(font_size));
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .filter_map(|line| self.ctx.measure_text(line).ok())
            .map(|m| m.width())
            .fold(0.0, f64::max);
        self.ctx.restore();
        Size::new(width, lines.len() as f64 * font_size * LINE_HEIGHT)
    }
}

//! Button visuals: nine-slice plane, label and icon placement
//!
//! All positions are local to the button.

use sd_core::{Insets, Point, Size};

use crate::attributes::{IconAttributes, ResolvedAttributes};
use crate::text::{FontStyle, TextMeasure};

/// The stretched background texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NineSlice {
    pub texture: Option<String>,
    pub padding: Insets,
    pub size: Size,
    /// Pivot in plane pixels (`anchor × size`)
    pub pivot: Point,
    pub position: Point,
}

impl NineSlice {
    /// Apply texture, padding, size and anchor of a state
    pub fn apply(&mut self, attr: &ResolvedAttributes) {
        if let Some(texture) = &attr.texture {
            self.texture = Some(texture.clone());
        }
        self.padding = attr.padding;
        self.size = attr.size;
        self.set_anchor(attr.anchor, attr.texture_offset);
    }

    /// Pivot at `anchor` and compensate so the plane stays in place, then
    /// shift by the texture offset
    pub fn set_anchor(&mut self, anchor: Point, texture_offset: Point) {
        self.pivot = Point::new(anchor.x * self.size.width, anchor.y * self.size.height);
        self.position = self.pivot.offset(texture_offset);
    }

    /// Top-left corner after pivot and position
    pub fn top_left(&self) -> Point {
        Point::new(
            self.position.x - self.pivot.x,
            self.position.y - self.pivot.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: FontStyle,
    /// Overrides `style.size`
    pub font_size: Option<f64>,
    pub resolution: f64,
    pub anchor: Point,
    pub position: Point,
    pub scale: f64,
    /// Unscaled extent of `text`
    pub natural_size: Size,
}

impl Label {
    pub fn new(text: impl Into<String>, font_size: Option<f64>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::default(),
            font_size,
            resolution: 1.0,
            anchor: Point::splat(0.5),
            position: Point::ZERO,
            scale: 1.0,
            natural_size: Size::default(),
        }
    }

    pub fn effective_font_size(&self) -> f64 {
        self.font_size.unwrap_or(self.style.size)
    }

    /// Displayed extent
    pub fn size(&self) -> Size {
        Size::new(
            self.natural_size.width * self.scale,
            self.natural_size.height * self.scale,
        )
    }

    /// Restyle, re-measure, then place at half the button size plus offset
    /// and shrink to fit if required
    pub fn layout(&mut self, attr: &ResolvedAttributes, button: Size, measure: &dyn TextMeasure) {
        self.style = attr.font_style.clone();
        self.resolution = attr.text_resolution;
        self.anchor = attr.text_anchor;
        self.natural_size = measure.measure(&self.text, &self.style, self.effective_font_size());
        self.position = Point::new(
            button.width / 2.0 + attr.text_offset.x,
            button.height / 2.0 + attr.text_offset.y,
        );
        if let Some(factor) = attr.fit_text {
            self.scale = fit_scale(self.natural_size, button, factor);
        }
    }
}

/// Scale for text of `text` extent inside `factor × button`: shrink when it
/// exceeds either side, otherwise 1
pub fn fit_scale(text: Size, button: Size, factor: f64) -> f64 {
    let max = Size::new(button.width * factor, button.height * factor);
    if text.width > max.width || text.height > max.height {
        text.fit_scale(max)
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub texture: String,
    /// Texture size at scale 1
    pub natural_size: Size,
    pub anchor: Point,
    pub position: Point,
    pub scale: f64,
}

impl Icon {
    pub fn new(texture: impl Into<String>, natural_size: Size) -> Self {
        Self {
            texture: texture.into(),
            natural_size,
            anchor: Point::ZERO,
            position: Point::ZERO,
            scale: 1.0,
        }
    }

    /// Displayed extent
    pub fn size(&self) -> Size {
        Size::new(
            self.natural_size.width * self.scale,
            self.natural_size.height * self.scale,
        )
    }

    /// Anchor, scale to target size, centre, then offset
    pub fn layout(&mut self, attr: &IconAttributes, button: Size) {
        if let Some(anchor) = attr.anchor {
            self.anchor = anchor;
        }
        self.position = Point::ZERO;

        if let Some(target) = attr.size {
            let current = self.size();
            let target = Size::new(
                target.width.unwrap_or(current.width),
                target.height.unwrap_or(current.height),
            );
            self.scale = self.natural_size.fit_scale(target);
        }

        let size = self.size();
        if attr.center_horizontally {
            self.position.x = button.width / 2.0 - size.width / 2.0;
        }
        if attr.center_vertically {
            self.position.y = button.height / 2.0 - size.height / 2.0;
        }
        if let Some(offset) = attr.offset {
            self.position = self.position.offset(offset);
        }
    }
}

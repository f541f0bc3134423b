//! Button states and per-state attributes
//!
//! Only STANDARD is required. Every other state lists just what differs;
//! [`ButtonData::resolve`] overlays those fields on STANDARD and fills the
//! remaining gaps with fixed defaults.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use sd_core::{Insets, Point, Size};

use crate::text::{Color, FontStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    Standard,
    Over,
    Click,
    Down,
    Disabled,
    Deactive,
    DeactiveOver,
}

impl ButtonState {
    pub const ALL: [ButtonState; 7] = [
        ButtonState::Standard,
        ButtonState::Deactive,
        ButtonState::DeactiveOver,
        ButtonState::Over,
        ButtonState::Click,
        ButtonState::Disabled,
        ButtonState::Down,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Over => "over",
            Self::Click => "click",
            Self::Down => "down",
            Self::Disabled => "disabled",
            Self::Deactive => "deactive",
            Self::DeactiveOver => "deactive_over",
        }
    }
}

/// Runs synchronously when a state is entered
pub type ButtonCallback = Rc<dyn Fn()>;

/// Requested icon size; a missing side keeps the current scale on that axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IconSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl IconSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Partial attributes of one state
#[derive(Clone, Default)]
pub struct ButtonAttributes {
    pub font_style: Option<FontStyle>,
    pub text_resolution: Option<f64>,
    /// Overrides the fill of `font_style`
    pub font_color: Option<Color>,
    pub texture: Option<String>,
    /// Nine-slice borders per side
    pub texture_padding: Option<Insets>,
    /// Nine-slice border on every side; wins over `texture_padding`
    pub all_padding: Option<f64>,
    pub anchor: Option<Point>,
    /// Sound alias played on entry
    pub sound: Option<String>,
    pub callback: Option<ButtonCallback>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Largest label extent as a fraction of the button size
    pub fit_text: Option<f64>,
    pub text_offset: Option<Point>,
    pub texture_offset: Option<Point>,
    pub text_anchor: Option<Point>,
    pub icon_texture: Option<String>,
    pub icon_offset: Option<Point>,
    pub icon_size: Option<IconSize>,
    pub icon_anchor: Option<Point>,
    pub center_icon_vertically: Option<bool>,
    pub center_icon_horizontally: Option<bool>,
}

impl ButtonAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn font(mut self, style: FontStyle) -> Self {
        self.font_style = Some(style);
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    pub fn text_resolution(mut self, resolution: f64) -> Self {
        self.text_resolution = Some(resolution);
        self
    }

    pub fn fit_text(mut self, factor: f64) -> Self {
        self.fit_text = Some(factor);
        self
    }

    pub fn all_padding(mut self, padding: f64) -> Self {
        self.all_padding = Some(padding);
        self
    }

    pub fn texture_padding(mut self, padding: Insets) -> Self {
        self.texture_padding = Some(padding);
        self
    }

    pub fn anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn texture_offset(mut self, offset: Point) -> Self {
        self.texture_offset = Some(offset);
        self
    }

    pub fn text_offset(mut self, offset: Point) -> Self {
        self.text_offset = Some(offset);
        self
    }

    pub fn text_anchor(mut self, anchor: Point) -> Self {
        self.text_anchor = Some(anchor);
        self
    }

    pub fn sound(mut self, alias: impl Into<String>) -> Self {
        self.sound = Some(alias.into());
        self
    }

    pub fn callback(mut self, callback: impl Fn() + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn icon(mut self, texture: impl Into<String>) -> Self {
        self.icon_texture = Some(texture.into());
        self
    }

    pub fn icon_size(mut self, size: IconSize) -> Self {
        self.icon_size = Some(size);
        self
    }

    pub fn icon_offset(mut self, offset: Point) -> Self {
        self.icon_offset = Some(offset);
        self
    }

    pub fn icon_anchor(mut self, anchor: Point) -> Self {
        self.icon_anchor = Some(anchor);
        self
    }

    pub fn center_icon(mut self, horizontally: bool, vertically: bool) -> Self {
        self.center_icon_horizontally = Some(horizontally);
        self.center_icon_vertically = Some(vertically);
        self
    }

    /// Fields set in `over` replace those of `self`
    pub fn overlay(&self, over: &ButtonAttributes) -> ButtonAttributes {
        ButtonAttributes {
            font_style: over.font_style.clone().or_else(|| self.font_style.clone()),
            text_resolution: over.text_resolution.or(self.text_resolution),
            font_color: over.font_color.or(self.font_color),
            texture: over.texture.clone().or_else(|| self.texture.clone()),
            texture_padding: over.texture_padding.or(self.texture_padding),
            all_padding: over.all_padding.or(self.all_padding),
            anchor: over.anchor.or(self.anchor),
            sound: over.sound.clone().or_else(|| self.sound.clone()),
            callback: over.callback.clone().or_else(|| self.callback.clone()),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            fit_text: over.fit_text.or(self.fit_text),
            text_offset: over.text_offset.or(self.text_offset),
            texture_offset: over.texture_offset.or(self.texture_offset),
            text_anchor: over.text_anchor.or(self.text_anchor),
            icon_texture: over.icon_texture.clone().or_else(|| self.icon_texture.clone()),
            icon_offset: over.icon_offset.or(self.icon_offset),
            icon_size: over.icon_size.or(self.icon_size),
            icon_anchor: over.icon_anchor.or(self.icon_anchor),
            center_icon_vertically: over.center_icon_vertically.or(self.center_icon_vertically),
            center_icon_horizontally: over
                .center_icon_horizontally
                .or(self.center_icon_horizontally),
        }
    }

    /// Fill every remaining gap with its fixed default
    pub fn resolve(&self) -> ResolvedAttributes {
        let padding = match (self.all_padding, self.texture_padding) {
            (Some(all), _) => Insets::uniform(all),
            (None, Some(sides)) => sides,
            (None, None) => Insets::default(),
        };
        let mut font_style = self.font_style.clone().unwrap_or_default();
        if let Some(color) = self.font_color {
            font_style.fill = color;
        }
        ResolvedAttributes {
            font_style,
            text_resolution: self.text_resolution.unwrap_or(1.0),
            texture: self.texture.clone(),
            padding,
            size: Size::new(self.width.unwrap_or(0.0), self.height.unwrap_or(0.0)),
            anchor: self.anchor.unwrap_or(Point::ZERO),
            texture_offset: self.texture_offset.unwrap_or(Point::ZERO),
            text_anchor: self.text_anchor.unwrap_or(Point::splat(0.5)),
            text_offset: self.text_offset.unwrap_or(Point::ZERO),
            fit_text: self.fit_text,
            icon: IconAttributes {
                texture: self.icon_texture.clone(),
                offset: self.icon_offset,
                size: self.icon_size,
                anchor: self.icon_anchor,
                center_horizontally: self.center_icon_horizontally.unwrap_or(false),
                center_vertically: self.center_icon_vertically.unwrap_or(false),
            },
            sound: self.sound.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl fmt::Debug for ButtonAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonAttributes")
            .field("texture", &self.texture)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("font_style", &self.font_style)
            .field("sound", &self.sound)
            .field("callback", &self.callback.as_ref().map(|_| "Fn()"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconAttributes {
    pub texture: Option<String>,
    pub offset: Option<Point>,
    pub size: Option<IconSize>,
    pub anchor: Option<Point>,
    pub center_horizontally: bool,
    pub center_vertically: bool,
}

/// Complete attribute set of one state
#[derive(Clone)]
pub struct ResolvedAttributes {
    /// Font with `font_color` already applied
    pub font_style: FontStyle,
    pub text_resolution: f64,
    pub texture: Option<String>,
    pub padding: Insets,
    pub size: Size,
    pub anchor: Point,
    pub texture_offset: Point,
    pub text_anchor: Point,
    pub text_offset: Point,
    pub fit_text: Option<f64>,
    pub icon: IconAttributes,
    pub sound: Option<String>,
    pub callback: Option<ButtonCallback>,
}

impl fmt::Debug for ResolvedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAttributes")
            .field("texture", &self.texture)
            .field("size", &self.size)
            .field("padding", &self.padding)
            .field("anchor", &self.anchor)
            .field("font_style", &self.font_style)
            .field("fit_text", &self.fit_text)
            .field("icon", &self.icon)
            .field("sound", &self.sound)
            .field("callback", &self.callback.as_ref().map(|_| "Fn()"))
            .finish()
    }
}

/// STANDARD attributes plus per-state overrides
#[derive(Debug, Clone, Default)]
pub struct ButtonData {
    standard: ButtonAttributes,
    overrides: HashMap<ButtonState, ButtonAttributes>,
}

impl ButtonData {
    pub fn new(standard: ButtonAttributes) -> Self {
        Self {
            standard,
            overrides: HashMap::new(),
        }
    }

    /// Add overrides for `state`; STANDARD overrides merge into the baseline
    pub fn with_state(mut self, state: ButtonState, attributes: ButtonAttributes) -> Self {
        if state == ButtonState::Standard {
            self.standard = self.standard.overlay(&attributes);
        } else {
            self.overrides.insert(state, attributes);
        }
        self
    }

    pub fn standard(&self) -> &ButtonAttributes {
        &self.standard
    }

    pub fn has_state(&self, state: ButtonState) -> bool {
        state == ButtonState::Standard || self.overrides.contains_key(&state)
    }

    /// `overlay(STANDARD, overrides[state])` with defaults applied
    pub fn resolve(&self, state: ButtonState) -> ResolvedAttributes {
        match self.overrides.get(&state) {
            Some(over) => self.standard.overlay(over).resolve(),
            None => self.standard.resolve(),
        }
    }
}

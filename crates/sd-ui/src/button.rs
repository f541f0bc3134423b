//! BaseButton — seven-state button
//!
//! Pointer transitions (ignored while DISABLED):
//!
//! | input | from              | to            |
//! |-------|-------------------|---------------|
//! | over  | DEACTIVE          | DEACTIVE_OVER |
//! | over  | any other         | OVER          |
//! | out   | DEACTIVE_OVER     | DEACTIVE      |
//! | out   | any other         | STANDARD      |
//! | tap   | any               | CLICK         |
//! | down  | any               | DOWN          |
//!
//! `disable`/`enable` and `deactivate`/`activate` force states from code.

use std::fmt;
use std::rc::Rc;

use sd_core::{Point, Rect, Size};
use sd_media::{SharedAssets, SharedAudio, SoundOptions};

use crate::attributes::{ButtonData, ButtonState, ResolvedAttributes};
use crate::error::{UiError, UiResult};
use crate::layout::{Icon, Label, NineSlice};
use crate::text::{ApproxTextMeasure, TextMeasure};

/// Pointer input as seen by a single button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Over,
    Out,
    Down,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Pointer,
    Auto,
}

impl Cursor {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Auto => "auto",
        }
    }
}

/// Services a button draws on
#[derive(Clone)]
pub struct ButtonServices {
    pub audio: Option<SharedAudio>,
    pub assets: Option<SharedAssets>,
    pub measure: Rc<dyn TextMeasure>,
}

impl ButtonServices {
    pub fn new(audio: SharedAudio, assets: SharedAssets) -> Self {
        Self {
            audio: Some(audio),
            assets: Some(assets),
            measure: Rc::new(ApproxTextMeasure),
        }
    }

    pub fn with_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }
}

impl Default for ButtonServices {
    fn default() -> Self {
        Self {
            audio: None,
            assets: None,
            measure: Rc::new(ApproxTextMeasure),
        }
    }
}

pub struct BaseButton {
    data: ButtonData,
    state: ButtonState,
    resolved: ResolvedAttributes,
    interactive: bool,
    cursor: Cursor,
    position: Point,
    plane: NineSlice,
    label: Option<Label>,
    icon: Option<Icon>,
    hit_area: Rect,
    services: ButtonServices,
}

impl BaseButton {
    /// Build the button and enter STANDARD.
    ///
    /// STANDARD must define width and height; textures are checked against the
    /// asset provider when one is present.
    pub fn new(data: ButtonData, services: ButtonServices) -> UiResult<Self> {
        let standard = data.standard();
        let width = standard.width.ok_or(UiError::MissingSize("width"))?;
        let height = standard.height.ok_or(UiError::MissingSize("height"))?;
        if !(width > 0.0 && height > 0.0) {
            return Err(UiError::InvalidSize { width, height });
        }

        if let Some(assets) = &services.assets {
            for state in ButtonState::ALL {
                let attr = data.resolve(state);
                for texture in attr.texture.iter().chain(attr.icon.texture.iter()) {
                    if !assets.has_texture(texture) {
                        return Err(UiError::TextureNotFound(texture.clone()));
                    }
                }
            }
        }

        let resolved = data.resolve(ButtonState::Standard);
        let mut button = Self {
            data,
            state: ButtonState::Standard,
            resolved,
            interactive: true,
            cursor: Cursor::Pointer,
            position: Point::ZERO,
            plane: NineSlice::default(),
            label: None,
            icon: None,
            hit_area: Rect::default(),
            services,
        };
        button.set_state(ButtonState::Standard);
        button.update_hit_area();
        Ok(button)
    }

    fn set_state(&mut self, state: ButtonState) {
        log::trace!("[BaseButton] {} -> {}", self.state.name(), state.name());
        self.state = state;
        self.resolved = self.data.resolve(state);

        self.plane.apply(&self.resolved);

        if let Some(texture) = self.resolved.icon.texture.clone() {
            self.set_icon(&texture);
        }
        if let Some(icon) = self.icon.as_mut() {
            icon.layout(&self.resolved.icon, self.plane.size);
        }

        if let (Some(alias), Some(audio)) = (&self.resolved.sound, &self.services.audio) {
            audio.play(alias, SoundOptions::default());
        }

        if let Some(callback) = self.resolved.callback.clone() {
            callback();
        }

        self.update_label();
    }

    /// Feed one pointer input; returns true if it changed state
    pub fn handle_input(&mut self, input: ButtonInput) -> bool {
        if self.state == ButtonState::Disabled {
            return false;
        }
        let next = match input {
            ButtonInput::Over if self.state == ButtonState::Deactive => ButtonState::DeactiveOver,
            ButtonInput::Over => ButtonState::Over,
            ButtonInput::Out if self.state == ButtonState::DeactiveOver => ButtonState::Deactive,
            ButtonInput::Out => ButtonState::Standard,
            ButtonInput::Tap => ButtonState::Click,
            ButtonInput::Down => ButtonState::Down,
        };
        self.set_state(next);
        true
    }

    pub fn enable(&mut self) {
        self.interactive = true;
        self.cursor = Cursor::Pointer;
        self.set_state(ButtonState::Standard);
    }

    pub fn disable(&mut self) {
        self.interactive = false;
        self.cursor = Cursor::Auto;
        self.set_state(ButtonState::Disabled);
    }

    pub fn deactivate(&mut self) {
        self.set_state(ButtonState::Deactive);
    }

    pub fn activate(&mut self) {
        self.interactive = true;
        self.cursor = Cursor::Pointer;
        self.set_state(ButtonState::Standard);
    }

    /// Set the label text, creating the label on first use
    pub fn set_label(&mut self, text: impl Into<String>, font_size: Option<f64>) {
        let text = text.into();
        match self.label.as_mut() {
            Some(label) => {
                label.text = text;
                if font_size.is_some() {
                    label.font_size = font_size;
                }
            }
            None => self.label = Some(Label::new(text, font_size)),
        }
        self.update_label();
    }

    fn update_label(&mut self) {
        if let Some(label) = self.label.as_mut() {
            label.layout(&self.resolved, self.plane.size, self.services.measure.as_ref());
        }
    }

    fn set_icon(&mut self, texture: &str) {
        let natural = self
            .services
            .assets
            .as_ref()
            .and_then(|assets| assets.texture_size(texture))
            .unwrap_or_default();
        match self.icon.as_mut() {
            Some(icon) => {
                icon.texture = texture.to_string();
                icon.natural_size = natural;
            }
            None => self.icon = Some(Icon::new(texture, natural)),
        }
    }

    pub fn remove_icon(&mut self) {
        self.icon = None;
    }

    fn update_hit_area(&mut self) {
        let (width, height) = ButtonState::ALL
            .iter()
            .map(|s| self.data.resolve(*s).size)
            .fold((0.0_f64, 0.0_f64), |(w, h), s| (w.max(s.width), h.max(s.height)));
        self.hit_area = Rect::new(0.0, 0.0, width, height);
    }

    /// Hit test in button-local coordinates
    pub fn contains(&self, local: Point) -> bool {
        self.hit_area.contains(local)
    }

    /// Hit test in parent coordinates
    pub fn contains_global(&self, point: Point) -> bool {
        self.contains(self.to_local(point))
    }

    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.position.x, point.y - self.position.y)
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn attributes(&self) -> &ResolvedAttributes {
        &self.resolved
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Current plane size
    pub fn size(&self) -> Size {
        self.plane.size
    }

    pub fn plane(&self) -> &NineSlice {
        &self.plane
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn hit_area(&self) -> Rect {
        self.hit_area
    }
}

impl fmt::Debug for BaseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseButton")
            .field("state", &self.state)
            .field("interactive", &self.interactive)
            .field("position", &self.position)
            .field("plane", &self.plane)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish()
    }
}

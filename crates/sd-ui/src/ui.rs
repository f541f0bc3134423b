//! Ui — the spin button and the pointer routing in front of it

use std::cell::Cell;
use std::rc::Rc;

use sd_core::{Point, Signal, Size};

use crate::attributes::{ButtonAttributes, ButtonData, ButtonState};
use crate::button::{BaseButton, ButtonInput, ButtonServices};
use crate::error::UiResult;
use crate::text::{Color, FontStyle, TextAlign};

pub const SPIN_BUTTON_TEXTURE: &str = "button_spin.png";
pub const SPIN_BUTTON_OVER_TEXTURE: &str = "button_spin_over.png";
pub const SPIN_BUTTON_DISABLED_TEXTURE: &str = "button_spin_disabled.png";
pub const SPIN_BUTTON_SIZE: Size = Size::new(150.0, 80.0);
/// Gap between the button centre line and the bottom of the screen
pub const SPIN_BUTTON_BOTTOM_MARGIN: f64 = 50.0;

/// Raw pointer input in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Point),
    Down(Point),
    Up(Point),
    /// Pointer left the surface
    Leave,
}

pub struct Ui {
    screen: Size,
    spin_button: Option<BaseButton>,
    clicked: Rc<Cell<bool>>,
    hovered: bool,
    pressed: bool,

    /// Fired after the spin button was clicked
    pub on_start_reel: Signal<()>,
}

impl Ui {
    /// Build the UI. A spin button that fails to build is logged and left out.
    pub fn new(screen: Size, services: ButtonServices) -> Self {
        let clicked = Rc::new(Cell::new(false));
        let spin_button = match Self::create_spin_button(screen, services, clicked.clone()) {
            Ok(button) => Some(button),
            Err(e) => {
                log::error!("Error creating spin button: {}", e);
                None
            }
        };
        Self {
            screen,
            spin_button,
            clicked,
            hovered: false,
            pressed: false,
            on_start_reel: Signal::new(),
        }
    }

    /// Attributes of the spin button; its CLICK callback raises `clicked`
    pub fn spin_button_data(clicked: Rc<Cell<bool>>) -> ButtonData {
        let font = FontStyle::new("Arial", 40.0)
            .bold()
            .fill(Color::WHITE)
            .align(TextAlign::Center);

        ButtonData::new(
            ButtonAttributes::new()
                .font(font.clone())
                .texture(SPIN_BUTTON_TEXTURE)
                .size(SPIN_BUTTON_SIZE.width, SPIN_BUTTON_SIZE.height)
                .fit_text(0.5)
                .text_resolution(1.5)
                .all_padding(50.0),
        )
        .with_state(
            ButtonState::Over,
            ButtonAttributes::new().texture(SPIN_BUTTON_OVER_TEXTURE),
        )
        .with_state(
            ButtonState::Disabled,
            ButtonAttributes::new()
                .font(font.fill(Color(0xaaaaaa)))
                .texture(SPIN_BUTTON_DISABLED_TEXTURE),
        )
        .with_state(
            ButtonState::Click,
            ButtonAttributes::new().callback(move || clicked.set(true)),
        )
    }

    fn create_spin_button(
        screen: Size,
        services: ButtonServices,
        clicked: Rc<Cell<bool>>,
    ) -> UiResult<BaseButton> {
        let mut button = BaseButton::new(Self::spin_button_data(clicked), services)?;
        let size = button.size();
        button.set_position(Point::new(
            screen.width / 2.0 - size.width / 2.0,
            screen.height - SPIN_BUTTON_BOTTOM_MARGIN - size.height / 2.0,
        ));
        button.set_label("SPIN", None);
        Ok(button)
    }

    pub fn reel_started(&mut self) {
        // the disabled button sees no pointer; the next move re-enters it
        self.hovered = false;
        self.pressed = false;
        if let Some(button) = self.spin_button.as_mut() {
            button.disable();
        }
    }

    pub fn reel_finished(&mut self) {
        if let Some(button) = self.spin_button.as_mut() {
            button.enable();
        }
    }

    /// Route a pointer event to the spin button.
    ///
    /// Returns true if the button took it. A click emits `on_start_reel`
    /// once the button has finished handling the event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(button) = self.spin_button.as_mut() else {
            return false;
        };
        if !button.is_interactive() {
            self.hovered = false;
            self.pressed = false;
            return false;
        }

        let inside = match event {
            PointerEvent::Move(p) | PointerEvent::Down(p) | PointerEvent::Up(p) => {
                button.contains_global(p)
            }
            PointerEvent::Leave => false,
        };

        let mut inputs = Vec::with_capacity(2);
        if inside && !self.hovered {
            self.hovered = true;
            inputs.push(ButtonInput::Over);
        } else if !inside && self.hovered {
            self.hovered = false;
            self.pressed = false;
            inputs.push(ButtonInput::Out);
        }
        match event {
            PointerEvent::Down(_) if inside => {
                self.pressed = true;
                inputs.push(ButtonInput::Down);
            }
            PointerEvent::Up(_) if inside && self.pressed => {
                self.pressed = false;
                inputs.push(ButtonInput::Tap);
            }
            PointerEvent::Up(_) => self.pressed = false,
            _ => {}
        }

        let mut handled = false;
        for input in inputs {
            handled |= button.handle_input(input);
        }

        if self.clicked.replace(false) {
            log::debug!("[Ui] spin requested");
            self.on_start_reel.dispatch();
        }
        handled
    }

    pub fn spin_button(&self) -> Option<&BaseButton> {
        self.spin_button.as_ref()
    }

    /// Screen-space centre of the spin button
    pub fn spin_button_center(&self) -> Option<Point> {
        self.spin_button.as_ref().map(|b| {
            let size = b.size();
            Point::new(
                b.position().x + size.width / 2.0,
                b.position().y + size.height / 2.0,
            )
        })
    }

    pub fn screen(&self) -> Size {
        self.screen
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("screen", &self.screen)
            .field("spin_button", &self.spin_button)
            .field("hovered", &self.hovered)
            .finish()
    }
}

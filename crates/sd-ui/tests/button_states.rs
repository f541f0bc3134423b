//! Button State Test Suite
//!
//! - STANDARD-only buttons resolve every state
//! - DISABLED swallows pointer input until enabled
//! - state entry side effects (sound, callback, label restyle)

use std::cell::RefCell;
use std::rc::Rc;

use sd_core::{Point, Size};
use sd_media::{AssetCatalog, PlaybackKind, SoundBank};
use sd_ui::{
    BaseButton, ButtonAttributes, ButtonData, ButtonInput, ButtonServices, ButtonState, Color,
    FontStyle, Ui,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn create_standard_only() -> BaseButton {
    BaseButton::new(
        ButtonData::new(
            ButtonAttributes::new()
                .texture("plain.png")
                .size(120.0, 60.0)
                .font(FontStyle::new("Arial", 30.0).fill(Color::WHITE)),
        ),
        ButtonServices::default(),
    )
    .expect("STANDARD with size is valid")
}

// ═══════════════════════════════════════════════════════════════════════════════
// FALLBACK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_standard_only_button_survives_every_state() {
    let mut button = create_standard_only();
    button.set_label("PLAY", None);

    let standard = button.attributes().clone();
    for input in [ButtonInput::Over, ButtonInput::Tap, ButtonInput::Down] {
        button.handle_input(input);
        let attr = button.attributes();
        assert_eq!(attr.texture, standard.texture);
        assert_eq!(attr.size, Size::new(120.0, 60.0));
        assert_eq!(button.label().unwrap().position, Point::new(60.0, 30.0));
    }

    button.disable();
    assert_eq!(button.state(), ButtonState::Disabled);
    assert_eq!(button.attributes().texture.as_deref(), Some("plain.png"));
    assert_eq!(button.label().unwrap().style.fill, Color::WHITE);
}

#[test]
fn test_disabled_ignores_pointer_until_enabled() {
    let mut button = create_standard_only();
    button.disable();

    for input in [
        ButtonInput::Over,
        ButtonInput::Down,
        ButtonInput::Tap,
        ButtonInput::Out,
    ] {
        assert!(!button.handle_input(input));
        assert_eq!(button.state(), ButtonState::Disabled);
    }

    button.enable();
    assert_eq!(button.state(), ButtonState::Standard);
    assert!(button.handle_input(ButtonInput::Over));
    assert_eq!(button.state(), ButtonState::Over);
}

#[test]
fn test_every_state_resolves_complete() {
    let data = ButtonData::new(ButtonAttributes::new().size(10.0, 10.0));
    for state in ButtonState::ALL {
        let attr = data.resolve(state);
        assert_eq!(attr.size, Size::new(10.0, 10.0), "{}", state.name());
        assert_eq!(attr.text_anchor, Point::new(0.5, 0.5));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY SIDE EFFECTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_entry_order_sound_then_callback() {
    let bank = Rc::new(SoundBank::with_sounds([("hover", "hover.mp3")]));
    let log: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

    let observed = log.clone();
    let probe = bank.clone();
    let data = ButtonData::new(ButtonAttributes::new().size(50.0, 50.0)).with_state(
        ButtonState::Over,
        ButtonAttributes::new()
            .sound("hover")
            .callback(move || observed.borrow_mut().push(probe.count("hover", PlaybackKind::Play))),
    );
    let services = ButtonServices {
        audio: Some(bank.clone()),
        ..ButtonServices::default()
    };
    let mut button = BaseButton::new(data, services).unwrap();

    button.handle_input(ButtonInput::Over);
    button.handle_input(ButtonInput::Out);
    button.handle_input(ButtonInput::Over);

    // the sound was already played when the callback ran
    assert_eq!(*log.borrow(), vec![1, 2]);
}

#[test]
fn test_spin_ui_with_demo_assets() {
    let services = ButtonServices::new(Rc::new(SoundBank::new()), Rc::new(AssetCatalog::demo()));
    let ui = Ui::new(Size::new(1920.0, 1080.0), services);
    let button = ui.spin_button().expect("demo catalog has the button textures");

    assert_eq!(button.plane().padding.left, 50.0);
    assert_eq!(button.attributes().text_resolution, 1.5);
    let label = button.label().unwrap();
    assert!(label.scale < 1.0);
    assert!(label.size().width <= 75.0 + 1e-9);
}

//! End-to-End Test Suite
//!
//! Full click → spin → finish loop through UI, controller and machine:
//! - notification ordering against reel motion
//! - button locking while spinning
//! - re-entrant clicks
//! - stage trace of a session

use std::cell::RefCell;
use std::rc::Rc;

use sd_core::Size;
use sd_game::Game;
use sd_media::{AssetCatalog, SoundBank};
use sd_reels::{MachineConfig, MachinePhase};
use sd_stage::{Stage, TimingConfig};
use sd_ui::{ButtonState, PointerEvent};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn create_game(config: MachineConfig, seed: u64) -> Game {
    let catalog = Rc::new(AssetCatalog::demo());
    let bank = Rc::new(SoundBank::new());
    catalog.register_sounds(bank.as_ref());
    Game::new(config, Size::new(1920.0, 1080.0), bank, catalog, seed).expect("valid config")
}

fn run_until_idle(game: &mut Game) -> u32 {
    let mut frames = 0;
    while game.machine().is_busy() {
        game.update(1.0);
        frames += 1;
        assert!(frames < 10_000, "spin never finished");
    }
    frames
}

// ═══════════════════════════════════════════════════════════════════════════════
// LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_four_reels_started_before_motion_finished_after_release() {
    let mut game = create_game(MachineConfig::default(), 21);
    assert_eq!(game.machine().reel_group().len(), 4);

    let started = Rc::new(RefCell::new(0));
    let finished = Rc::new(RefCell::new(0));
    {
        let started = started.clone();
        game.machine_mut()
            .on_reel_started
            .connect(move |_| *started.borrow_mut() += 1);
    }
    {
        let finished = finished.clone();
        game.machine_mut()
            .on_reel_finished
            .connect(move |_| *finished.borrow_mut() += 1);
    }

    assert!(game.tap_spin_button());
    assert_eq!(*started.borrow(), 1);
    assert!(
        game.machine()
            .reel_group()
            .reels()
            .iter()
            .all(|r| r.speed() == 0.0)
    );

    while *finished.borrow() == 0 {
        game.update(1.0);
        if *finished.borrow() == 1 {
            assert!(
                game.machine()
                    .reel_group()
                    .reels()
                    .iter()
                    .all(|r| !r.is_spinning())
            );
        }
    }

    run_until_idle(&mut game);
    assert_eq!(*started.borrow(), 1);
    assert_eq!(*finished.borrow(), 1);
}

#[test]
fn test_button_locked_while_spinning() {
    let mut game = create_game(MachineConfig::default(), 5);
    assert!(game.tap_spin_button());

    let button = game.ui().spin_button().unwrap();
    assert_eq!(button.state(), ButtonState::Disabled);
    assert!(!button.is_interactive());

    run_until_idle(&mut game);
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Standard);
}

#[test]
fn test_clicks_while_spinning_do_not_start_another_spin() {
    let mut game = create_game(MachineConfig::default(), 8);
    let started = Rc::new(RefCell::new(0));
    let counter = started.clone();
    game.machine_mut()
        .on_reel_started
        .connect(move |_| *counter.borrow_mut() += 1);

    assert!(game.tap_spin_button());
    for _ in 0..30 {
        game.update(1.0);
        assert!(!game.tap_spin_button());
    }
    // a spin() call that slips past the UI is rejected too
    assert!(!game.machine_mut().spin());
    assert_eq!(*started.borrow(), 1);
    assert_eq!(game.machine().spin_count(), 1);

    run_until_idle(&mut game);
    assert!(game.tap_spin_button());
    assert_eq!(*started.borrow(), 2);
}

#[test]
fn test_finished_fires_after_all_reels_released() {
    for seed in 0..6 {
        let mut game = create_game(MachineConfig::default(), seed);
        let finished = Rc::new(RefCell::new(Vec::new()));
        let log = finished.clone();
        game.machine_mut()
            .on_stage
            .connect(move |event| log.borrow_mut().push(event.stage.clone()));

        game.tap_spin_button();
        run_until_idle(&mut game);

        let stages = finished.borrow();
        let end = stages
            .iter()
            .position(|s| *s == Stage::SpinEnd)
            .expect("spin ended");
        let releases = stages[..end]
            .iter()
            .filter(|s| matches!(s, Stage::ReelSpinStop { .. }))
            .count();
        assert_eq!(releases, 4, "seed {seed}");
        assert!(
            game.machine()
                .reel_group()
                .reels()
                .iter()
                .all(|r| !r.is_spinning())
        );
    }
}

#[test]
fn test_win_celebration_delays_finish() {
    let config = MachineConfig {
        win_probability: 1.0,
        ..MachineConfig::default()
    }
    .with_timing(TimingConfig::turbo());
    let mut game = create_game(config, 2);

    game.tap_spin_button();
    while game.machine().phase() != MachinePhase::Celebrating {
        game.update(1.0);
    }
    assert!(!game.machine().is_spinning());
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Disabled);

    run_until_idle(&mut game);
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Standard);
    assert_eq!(game.machine().win_count(), 1);
}

#[test]
fn test_session_trace_is_valid_json() {
    let config = MachineConfig::default().with_timing(TimingConfig::instant());
    let mut game = create_game(config, 99);
    game.machine_mut().record_trace("session");

    for _ in 0..5 {
        assert!(game.tap_spin_button());
        run_until_idle(&mut game);
    }

    let trace = game.machine_mut().take_trace().unwrap();
    assert!(trace.validate().is_ok());
    assert_eq!(trace.count("spin_start"), 5);
    assert_eq!(trace.count("spin_end"), 5);

    let json = trace.to_json().unwrap();
    let back = sd_stage::StageTrace::from_json(&json).unwrap();
    assert_eq!(back.len(), trace.len());
}

#[test]
fn test_pointer_leave_resets_hover() {
    let mut game = create_game(MachineConfig::default(), 1);
    let center = game.ui().spin_button_center().unwrap();
    game.pointer(PointerEvent::Move(center));
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Over);
    game.pointer(PointerEvent::Leave);
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Standard);
    assert!(!game.machine().is_busy());
}

#[test]
fn test_pointer_still_over_button_after_spin_hovers_again() {
    let mut game = create_game(MachineConfig::default(), 3);
    let center = game.ui().spin_button_center().unwrap();
    game.pointer(PointerEvent::Move(center));
    game.pointer(PointerEvent::Down(center));
    game.pointer(PointerEvent::Up(center));
    assert!(game.machine().is_busy());

    run_until_idle(&mut game);
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Standard);

    game.pointer(PointerEvent::Move(center));
    assert_eq!(game.ui().spin_button().unwrap().state(), ButtonState::Over);
}

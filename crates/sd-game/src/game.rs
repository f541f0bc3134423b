//! Game — machine, UI and controller behind one frame tick

use std::rc::Rc;

use sd_core::{FrameClock, Point, Size};
use sd_media::{SharedAssets, SharedAudio};
use sd_reels::{ConfigResult, MachineConfig, SlotMachine};
use sd_ui::{ApproxTextMeasure, ButtonServices, PointerEvent, TextMeasure, Ui};

use crate::controller::GameController;

pub struct Game {
    machine: SlotMachine,
    ui: Ui,
    controller: GameController,
    clock: FrameClock,
}

impl Game {
    pub fn new(
        config: MachineConfig,
        screen: Size,
        audio: SharedAudio,
        assets: SharedAssets,
        seed: u64,
    ) -> ConfigResult<Self> {
        Self::with_measure(config, screen, audio, assets, Rc::new(ApproxTextMeasure), seed)
    }

    /// Build with a custom text measure (the browser measures on the canvas)
    pub fn with_measure(
        config: MachineConfig,
        screen: Size,
        audio: SharedAudio,
        assets: SharedAssets,
        measure: Rc<dyn TextMeasure>,
        seed: u64,
    ) -> ConfigResult<Self> {
        let mut machine =
            SlotMachine::with_seed(config, screen, audio.clone(), assets.as_ref(), seed)?;
        let services = ButtonServices::new(audio, assets).with_measure(measure);
        let mut ui = Ui::new(screen, services);
        let controller = GameController::connect(&mut machine, &mut ui);
        log::info!(
            "[Game] ready on {}x{} screen",
            screen.width as u32,
            screen.height as u32
        );
        Ok(Self {
            machine,
            ui,
            controller,
            clock: FrameClock::new(),
        })
    }

    /// Advance by `delta_frames`, then deliver queued events
    pub fn update(&mut self, delta_frames: f64) {
        self.machine.update(delta_frames);
        self.controller.dispatch(&mut self.machine, &mut self.ui);
    }

    /// Advance from a wall-clock timestamp; returns the frame delta used
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = self.clock.tick(now_ms);
        self.update(delta);
        delta
    }

    /// Route pointer input, then deliver queued events
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        let handled = self.ui.handle_pointer(event);
        self.controller.dispatch(&mut self.machine, &mut self.ui);
        handled
    }

    /// Move, press and release on the spin button centre
    pub fn tap_spin_button(&mut self) -> bool {
        let Some(center) = self.ui.spin_button_center() else {
            return false;
        };
        self.pointer(PointerEvent::Move(center));
        self.pointer(PointerEvent::Down(center));
        let handled = self.pointer(PointerEvent::Up(center));
        // move away so the next tap starts from outside
        self.pointer(PointerEvent::Move(Point::new(-1.0, -1.0)));
        handled
    }

    pub fn machine(&self) -> &SlotMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut SlotMachine {
        &mut self.machine
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("machine", &self.machine)
            .field("ui", &self.ui)
            .field("controller", &self.controller)
            .finish()
    }
}

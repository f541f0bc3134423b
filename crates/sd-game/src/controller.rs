//! Game controller — mediator between UI and slot machine

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use sd_core::Signal;
use sd_reels::SlotMachine;
use sd_ui::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// Spin button clicked
    StartReel,
    /// Machine accepted a spin
    ReelStarted,
    /// Machine finished a spin
    ReelFinished,
}

type EventQueue = Rc<RefCell<VecDeque<GameEvent>>>;

#[derive(Debug, Default)]
pub struct GameController {
    queue: EventQueue,
    dispatched: u64,
}

impl GameController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a controller already subscribed to `machine` and `ui`
    pub fn connect(machine: &mut SlotMachine, ui: &mut Ui) -> Self {
        let controller = Self::new();
        controller.enqueue_on(&mut ui.on_start_reel, GameEvent::StartReel);
        controller.enqueue_on(&mut machine.on_reel_started, GameEvent::ReelStarted);
        controller.enqueue_on(&mut machine.on_reel_finished, GameEvent::ReelFinished);
        controller
    }

    /// Make `signal` push `event` on every emission
    pub fn enqueue_on<T>(&self, signal: &mut Signal<T>, event: GameEvent) {
        let queue = self.queue.clone();
        signal.connect(move |_| queue.borrow_mut().push_back(event));
    }

    /// Drain the queue, including events produced while draining.
    /// Returns how many events were handled.
    pub fn dispatch(&mut self, machine: &mut SlotMachine, ui: &mut Ui) -> usize {
        let mut handled = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            log::debug!("[GameController] {:?}", event);
            match event {
                GameEvent::StartReel => {
                    machine.spin();
                }
                GameEvent::ReelStarted => ui.reel_started(),
                GameEvent::ReelFinished => ui.reel_finished(),
            }
            handled += 1;
        }
        self.dispatched += handled as u64;
        handled
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Events handled since construction
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_only_enqueue() {
        let controller = GameController::new();
        let mut signal: Signal<()> = Signal::new();
        controller.enqueue_on(&mut signal, GameEvent::ReelFinished);
        signal.dispatch();
        signal.dispatch();
        assert_eq!(controller.pending(), 2);
        assert_eq!(controller.dispatched(), 0);
    }
}

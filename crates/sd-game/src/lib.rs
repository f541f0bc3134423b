//! # sd-game — SpinDeck game composition
//!
//! [`GameController`] is the only place where UI and machine meet. Their
//! signals push [`GameEvent`]s into a queue and [`GameController::dispatch`]
//! turns them into calls once the emitter has returned, so no component is
//! ever borrowed twice.
//!
//! [`Game`] bundles machine, UI and controller behind a frame tick and a
//! pointer entry point.

pub mod controller;
pub mod game;

pub use controller::*;
pub use game::*;

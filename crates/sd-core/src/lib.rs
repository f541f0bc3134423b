//! sd-core: Shared types and utilities for SpinDeck
//!
//! This crate provides the foundational types used across all SpinDeck crates:
//! screen-space geometry, the 60 fps frame clock, easing curves for tweens and
//! the typed [`Signal`] observer used to decouple components.

mod easing;
mod geometry;
mod signal;
mod time;

pub use easing::*;
pub use geometry::*;
pub use signal::*;
pub use time::*;

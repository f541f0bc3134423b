//! # sd-ui — SpinDeck user interface
//!
//! A [`BaseButton`] is a seven-state visual state machine. Each state resolves
//! a complete attribute set by overlaying its own fields on the STANDARD
//! attributes; entering a state applies the set, plays its sound, runs its
//! callback and lays out the label and icon.
//!
//! [`Ui`] owns the spin button and turns its click into `on_start_reel`.

pub mod attributes;
pub mod button;
pub mod error;
pub mod layout;
pub mod text;
pub mod ui;

pub use attributes::*;
pub use button::*;
pub use error::*;
pub use layout::*;
pub use text::*;
pub use ui::*;

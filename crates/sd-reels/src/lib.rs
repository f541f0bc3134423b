//! # sd-reels — SpinDeck reel engine
//!
//! Horizontal reels driven by a frame clock:
//!
//! ```text
//! SlotMachine ── ReelGroup ── Reel ── SymbolStrip ── Symbol
//!      │             │          └ velocity / blur / settle
//!      │             └ staggered start & stop timelines
//!      └ spin lifecycle, win outcome, decorations, stage events
//! ```
//!
//! Everything advances through `update(delta_frames)`; there are no timers and
//! no threads. One frame is `1000 / 60` ms of virtual time.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sd_reels::{MachineConfig, SlotMachine};
//!
//! let mut machine = SlotMachine::with_seed(config, screen, audio, &assets, 42)?;
//! machine.spin();
//! while machine.is_busy() {
//!     machine.update(1.0);
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod machine;
pub mod reel;
pub mod reel_group;
pub mod symbols;

pub use config::*;
pub use error::*;
pub use layout::*;
pub use machine::*;
pub use reel::*;
pub use reel_group::*;
pub use symbols::*;

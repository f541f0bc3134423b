//! # sd-stage — SpinDeck Stage System
//!
//! Defines the stages a spin passes through and the timing that separates them.
//!
//! ## Philosophy
//!
//! Every spin, regardless of outcome, passes through the same semantic phases:
//! - Spin starts → Reels start one by one → Reels stop one by one → Reels settle
//!   → Win presented (optional) → Spin ends
//!
//! Consumers (audio, UI, tooling) react to stages, never to raw reel state.
//! Delays between phases are expressed on a [`Timeline`], a virtual clock that
//! the frame loop advances.

pub mod event;
pub mod stage;
pub mod timing;
pub mod trace;

pub use event::*;
pub use stage::*;
pub use timing::*;
pub use trace::*;

//! # sd-media — SpinDeck media services
//!
//! Narrow interfaces over the things the presentation layer consumes but does
//! not implement: sound playback, texture/skeleton lookup and skeletal clip
//! timing.
//!
//! Services are injected as `Rc<dyn ...>` handles. The in-memory
//! implementations ([`SoundBank`], [`AssetCatalog`]) back native runs and tests;
//! the browser implementations live in `sd-wasm`.

pub mod animation;
pub mod assets;
pub mod audio;
pub mod error;

pub use animation::*;
pub use assets::*;
pub use audio::*;
pub use error::*;

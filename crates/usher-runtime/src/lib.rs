#![forbid(unsafe_code)]

//! The Usher tour engine.
//!
//! This crate layers step sequencing on top of the primitives in
//! [`usher_core`]: a [`Tour`] owns an ordered list of [`Step`]s and drives
//! a host-provided [`ViewportAdapter`] through highlight tracking, box
//! placement, scrolling, countdowns, and lifecycle hooks.
//!
//! The engine is host-pumped: nothing here spawns threads or sleeps. The
//! embedder forwards user intents and calls [`Tour::tick`] with the
//! current instant; deferred work runs off an internal scheduler.

pub mod adapter;
mod auto_advance;
pub mod config;
pub mod controller;
pub mod error;
mod highlight;
pub mod step;
mod tasks;
pub mod testing;

pub use adapter::{FrameUpdate, ViewportAdapter};
pub use config::{ALLOWED_ANIMATIONS, TourConfig, TourHooks, is_allowed_animation};
pub use controller::{Direction, NavKey, NavState, Phase, Tour};
pub use error::{ConfigError, InvalidStepReason};
pub use step::{AutoNextPredicate, FinishHook, Gate, Step, StepHook, StepHooks, TargetSpec};

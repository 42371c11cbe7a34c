#![forbid(unsafe_code)]

//! Core primitives for the Usher guided-overlay engine.
//!
//! This crate is the leaf of the workspace: pure geometry
//! ([`geometry`]), placement resolution ([`position`]), scroll planning
//! ([`scroll`]), and cooperative scheduling ([`schedule`]). It knows
//! nothing about steps, adapters, or the tour state machine — those live
//! in `usher-runtime`.
//!
//! Everything here is deterministic: no threads, no ambient clocks. Time
//! enters through explicit `Instant` parameters supplied by the host.

pub mod geometry;
pub mod position;
pub mod schedule;
pub mod scroll;

pub use geometry::{Rect, ScrollTarget, Sides, Size, Viewport};
pub use position::{
    BoxOffset, Placement, Position, PositionResolver, ResolveContext, ResolvedPosition,
};
pub use schedule::{Scheduler, TaskId, Timer};
pub use scroll::ScrollPlanner;

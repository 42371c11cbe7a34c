#![forbid(unsafe_code)]

//! Usher: a guided-tour overlay engine.
//!
//! Usher walks a user through a page one step at a time: it highlights a
//! target region, places an explanatory box next to it, scrolls it into
//! view, and sequences steps with navigation gates, countdowns, and
//! auto-advance conditions. The engine itself never touches a document —
//! the embedder implements [`ViewportAdapter`] and pumps [`Tour::tick`].
//!
//! This crate is a facade over the workspace members:
//!
//! - [`usher_core`] (re-exported as [`core`]): geometry, placement
//!   resolution, scroll planning, scheduling.
//! - [`usher_runtime`] (re-exported as [`runtime`]): steps, configuration,
//!   the adapter trait, and the tour state machine.
//!
//! # Example
//!
//! ```
//! use usher::prelude::*;
//! use usher::runtime::testing::{ManualClock, MockViewport};
//!
//! let mut page = MockViewport::new();
//! page.insert_element("#compose", Rect::new(120.0, 80.0, 90.0, 30.0));
//!
//! let steps = vec![
//!     Step::new()
//!         .content("Click here to write a message")
//!         .target_selector("#compose")
//!         .position(Position::Bottom),
//!     Step::new().content("That's it!"),
//! ];
//!
//! let mut clock = ManualClock::new();
//! let mut tour = Tour::new(page, steps, TourConfig::default()).unwrap();
//! tour.start(clock.now());
//! assert_eq!(tour.phase(), Phase::StepActive);
//!
//! tour.next(false, clock.now());
//! tour.tick(clock.advance(std::time::Duration::from_millis(100)));
//! assert_eq!(tour.current_index(), 1);
//! ```

pub use usher_core as core;
pub use usher_runtime as runtime;

pub use usher_core::{
    BoxOffset, Placement, Position, PositionResolver, Rect, ResolveContext, ResolvedPosition,
    Scheduler, ScrollPlanner, ScrollTarget, Sides, Size, TaskId, Timer, Viewport,
};
pub use usher_runtime::{
    ConfigError, Direction, FrameUpdate, Gate, InvalidStepReason, NavKey, NavState, Phase, Step,
    StepHooks, TargetSpec, Tour, TourConfig, TourHooks, ViewportAdapter,
};

/// The most common imports in one place.
pub mod prelude {
    pub use usher_core::{Position, Rect, Sides, Size, Viewport};
    pub use usher_runtime::{
        FrameUpdate, Gate, NavKey, Phase, Step, TargetSpec, Tour, TourConfig, ViewportAdapter,
    };
}

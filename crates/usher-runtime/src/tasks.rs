#![forbid(unsafe_code)]

//! Payloads for the engine's internal scheduler.

use web_time::Duration;

/// Cadence for the deferred-lookup, highlight-adjustment, and
/// auto-advance polls.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Debounce applied between a resize notification and the re-scroll.
pub(crate) const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Where a pending step transition lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionGoal {
    /// Run the step at this index.
    Run(usize),
    /// The tour ran past its last step.
    Finalize,
}

/// Work items pumped through the scheduler by [`Tour::tick`].
///
/// [`Tour::tick`]: crate::Tour::tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskKind {
    /// Retry resolving the current step's selector.
    DeferredLookup,
    /// Re-measure the highlighted element and track changes.
    HighlightAdjust,
    /// Re-evaluate the current step's auto-advance predicate.
    AutoAdvance,
    /// Apply a delayed step transition.
    Transition(TransitionGoal),
    /// Re-scroll after a debounced viewport resize.
    RescrollAfterResize,
    /// Deactivate the overlay after the tour stopped.
    Deactivate,
}

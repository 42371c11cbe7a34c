#![forbid(unsafe_code)]

//! The boundary between the tour engine and the host page.
//!
//! The engine never touches a real document. Everything it needs — element
//! lookup, geometry measurement, scrolling, overlay visuals — goes through
//! a [`ViewportAdapter`] supplied by the embedder. This keeps the state
//! machine deterministic and lets tests drive it with a scripted mock.
//!
//! # Invariants
//!
//! 1. The engine only calls `measure` with elements previously returned by
//!    `query` on the same adapter.
//! 2. Visual mutators are idempotent: the engine may repeat a call with the
//!    same arguments and the adapter must tolerate it.

use std::fmt;

use usher_core::{Placement, Rect, ScrollTarget, Size, Viewport};
use web_time::Duration;

/// A change to the highlight frame's geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameUpdate {
    /// No target: park the frame out of view.
    Hidden,
    /// Target deliberately frameless: collapse to zero size.
    Collapsed,
    /// Track the given padded target geometry.
    At(Rect),
}

/// Host-side surface the tour engine drives.
///
/// `Element` is an opaque handle to whatever the host resolves selectors
/// to. Equality is used for highlight change detection, `Clone` because the
/// engine retains the handle across polls.
pub trait ViewportAdapter {
    type Element: Clone + PartialEq + fmt::Debug;

    /// Resolve a selector to an element, if one currently exists.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Measure an element's page-coordinate geometry. `None` if the
    /// element has left the document.
    fn measure(&self, element: &Self::Element) -> Option<Rect>;

    /// Current scroll offset and visible size.
    fn viewport(&self) -> Viewport;

    /// Full size of the document body.
    fn body_size(&self) -> Size;

    /// Outer size of the floating step box.
    fn step_box_size(&self) -> Size;

    /// The page URL as currently loaded.
    fn current_url(&self) -> String;

    /// Navigate to a different URL.
    fn navigate(&mut self, url: &str);

    /// Animate the document scroll offset to `target`.
    fn scroll_to(&mut self, target: ScrollTarget, duration: Duration);

    /// Show or hide the dimming overlay.
    fn set_overlay_active(&mut self, active: bool);

    /// Show or hide the highlight frame.
    fn set_highlight_visible(&mut self, visible: bool);

    /// Replace the set of extra classes on the overlay wholesale.
    fn set_overlay_classes(&mut self, classes: &[String]);

    /// Move or hide the highlight frame.
    fn update_frame(&mut self, update: FrameUpdate);

    /// Position the floating step box per the resolved placement.
    fn place_box(&mut self, placement: &Placement);

    /// Show or hide the floating step box.
    fn set_box_visible(&mut self, visible: bool);

    /// Show or hide the step box inside the anchored container.
    fn set_anchored_box_visible(&mut self, visible: bool);

    /// Apply an entry animation to the step box, or clear it.
    fn set_box_animation(&mut self, animation: Option<&str>);

    /// Start the countdown visual for the given duration.
    fn show_countdown(&mut self, duration: Duration);

    /// Freeze the countdown visual in place.
    fn pause_countdown(&mut self);

    /// Remove the countdown visual.
    fn hide_countdown(&mut self);
}

#![forbid(unsafe_code)]

//! Highlight tracking.
//!
//! The highlight frame follows the current step's target element. Two
//! polls may be involved, never both at once: a deferred lookup when the
//! selector does not resolve yet, and a geometry adjustment poll once it
//! has. Both run on the engine's scheduler so tests can drive them with a
//! manual clock.
//!
//! # Invariants
//!
//! 1. At most one poll (lookup or adjust) is registered at any time.
//! 2. The stored frame is always the padded geometry last pushed to the
//!    adapter, so change detection and placement agree on coordinates.

use usher_core::{Rect, Scheduler, Sides, TaskId};
use web_time::Instant;

use crate::adapter::{FrameUpdate, ViewportAdapter};
use crate::step::TargetSpec;
use crate::tasks::{POLL_INTERVAL, TaskKind};

/// Resolution state of the current step's target.
#[derive(Debug, Clone, PartialEq)]
enum HighlightTarget<E> {
    /// No target; the highlight is hidden.
    None,
    /// Targeted but deliberately without frame geometry.
    Frameless,
    /// Selector did not resolve yet; a lookup poll is pending.
    Pending(String),
    /// Tracking a live element.
    Resolved(E),
}

/// Tracks the highlight frame for the current step.
#[derive(Debug)]
pub(crate) struct HighlightEngine<E> {
    target: HighlightTarget<E>,
    frame: Option<Rect>,
    lookup_poll: Option<TaskId>,
    adjust_poll: Option<TaskId>,
    padding: Sides,
}

impl<E: Clone + PartialEq> HighlightEngine<E> {
    pub(crate) fn new(padding: Sides) -> Self {
        Self {
            target: HighlightTarget::None,
            frame: None,
            lookup_poll: None,
            adjust_poll: None,
            padding,
        }
    }

    /// Padded geometry of the current highlight, if resolved.
    pub(crate) fn frame(&self) -> Option<Rect> {
        self.frame
    }

    /// Whether the step has a target at all (resolved or not).
    pub(crate) fn is_active(&self) -> bool {
        self.target != HighlightTarget::None
    }

    /// Point the highlight at a new target, replacing any previous state.
    ///
    /// Returns `true` when frame geometry was applied immediately, so the
    /// caller can place the step box and scroll right away.
    pub(crate) fn set_target<A>(
        &mut self,
        spec: &TargetSpec<E>,
        adapter: &mut A,
        scheduler: &mut Scheduler<TaskKind>,
        now: Instant,
    ) -> bool
    where
        A: ViewportAdapter<Element = E>,
    {
        self.cancel_polls(scheduler);
        self.frame = None;

        match spec {
            _ if !spec.is_present() => {
                self.target = HighlightTarget::None;
                adapter.update_frame(FrameUpdate::Hidden);
                adapter.set_highlight_visible(false);
                false
            }
            TargetSpec::Frameless => {
                self.target = HighlightTarget::Frameless;
                adapter.update_frame(FrameUpdate::Collapsed);
                adapter.set_highlight_visible(true);
                false
            }
            TargetSpec::Selector(selector) => match adapter.query(selector) {
                Some(element) => self.resolve(element, adapter, scheduler, now),
                None => {
                    // Element not in the document yet; retry on a cadence
                    // and keep the frame parked out of view meanwhile.
                    self.target = HighlightTarget::Pending(selector.clone());
                    adapter.update_frame(FrameUpdate::Hidden);
                    adapter.set_highlight_visible(true);
                    self.lookup_poll =
                        Some(scheduler.schedule_repeat(now, POLL_INTERVAL, TaskKind::DeferredLookup));
                    false
                }
            },
            TargetSpec::Element(element) => {
                self.resolve(element.clone(), adapter, scheduler, now)
            }
            TargetSpec::None => unreachable!("handled by the is_present guard"),
        }
    }

    /// Retry a pending selector lookup. Returns `true` on resolution.
    pub(crate) fn poll_lookup<A>(
        &mut self,
        adapter: &mut A,
        scheduler: &mut Scheduler<TaskKind>,
        now: Instant,
    ) -> bool
    where
        A: ViewportAdapter<Element = E>,
    {
        let HighlightTarget::Pending(selector) = &self.target else {
            return false;
        };
        let Some(element) = adapter.query(selector) else {
            return false;
        };
        if let Some(id) = self.lookup_poll.take() {
            scheduler.cancel(id);
        }
        self.resolve(element, adapter, scheduler, now);
        true
    }

    /// Re-measure the tracked element. Returns `true` when the padded
    /// frame moved and was pushed to the adapter. A vanished element keeps
    /// the last frame in place.
    pub(crate) fn adjust<A>(&mut self, adapter: &mut A) -> bool
    where
        A: ViewportAdapter<Element = E>,
    {
        let HighlightTarget::Resolved(element) = &self.target else {
            return false;
        };
        match adapter.measure(element) {
            Some(rect) => self.apply_frame(rect, adapter),
            None => false,
        }
    }

    /// Drop target, frame, and polls. Visual teardown is the caller's job.
    pub(crate) fn conclude(&mut self, scheduler: &mut Scheduler<TaskKind>) {
        self.cancel_polls(scheduler);
        self.target = HighlightTarget::None;
        self.frame = None;
    }

    fn resolve<A>(
        &mut self,
        element: E,
        adapter: &mut A,
        scheduler: &mut Scheduler<TaskKind>,
        now: Instant,
    ) -> bool
    where
        A: ViewportAdapter<Element = E>,
    {
        let measured = adapter.measure(&element);
        self.target = HighlightTarget::Resolved(element);
        adapter.set_highlight_visible(true);
        let applied = match measured {
            Some(rect) => self.apply_frame(rect, adapter),
            None => {
                adapter.update_frame(FrameUpdate::Hidden);
                false
            }
        };
        self.adjust_poll =
            Some(scheduler.schedule_repeat(now, POLL_INTERVAL, TaskKind::HighlightAdjust));
        applied
    }

    fn apply_frame<A>(&mut self, rect: Rect, adapter: &mut A) -> bool
    where
        A: ViewportAdapter<Element = E>,
    {
        let padded = rect.expand(self.padding);
        if self.frame == Some(padded) {
            return false;
        }
        self.frame = Some(padded);
        adapter.update_frame(FrameUpdate::At(padded));
        true
    }

    fn cancel_polls(&mut self, scheduler: &mut Scheduler<TaskKind>) {
        if let Some(id) = self.lookup_poll.take() {
            scheduler.cancel(id);
        }
        if let Some(id) = self.adjust_poll.take() {
            scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockViewport;
    use web_time::Duration;

    fn engine() -> HighlightEngine<crate::testing::MockElement> {
        HighlightEngine::new(Sides::all(5.0))
    }

    #[test]
    fn immediate_resolution_applies_padded_frame() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        adapter.insert_element("#go", Rect::new(100.0, 100.0, 50.0, 20.0));
        let mut scheduler = Scheduler::new();
        let mut engine = engine();

        let applied = engine.set_target(
            &TargetSpec::Selector("#go".into()),
            &mut adapter,
            &mut scheduler,
            now,
        );
        assert!(applied);
        assert_eq!(engine.frame(), Some(Rect::new(95.0, 95.0, 60.0, 30.0)));
        // Adjustment poll armed, lookup poll not.
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn missing_selector_defers_lookup() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        let mut scheduler = Scheduler::new();
        let mut engine = engine();

        let applied = engine.set_target(
            &TargetSpec::Selector("#late".into()),
            &mut adapter,
            &mut scheduler,
            now,
        );
        assert!(!applied);
        assert!(engine.is_active());
        assert_eq!(engine.frame(), None);

        // Element appears; the next lookup poll resolves it and swaps the
        // lookup poll for the adjustment poll.
        adapter.insert_element("#late", Rect::new(10.0, 10.0, 10.0, 10.0));
        assert!(engine.poll_lookup(&mut adapter, &mut scheduler, now + Duration::from_millis(100)));
        assert_eq!(engine.frame(), Some(Rect::new(5.0, 5.0, 20.0, 20.0)));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn adjust_reports_movement_once() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        let element = adapter.insert_element("#go", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut scheduler = Scheduler::new();
        let mut engine = engine();
        engine.set_target(
            &TargetSpec::Element(element),
            &mut adapter,
            &mut scheduler,
            now,
        );

        // Unmoved element: no change reported.
        assert!(!engine.adjust(&mut adapter));

        adapter.move_element("#go", Rect::new(40.0, 0.0, 10.0, 10.0));
        assert!(engine.adjust(&mut adapter));
        assert!(!engine.adjust(&mut adapter));
    }

    #[test]
    fn vanished_element_keeps_last_frame() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        adapter.insert_element("#go", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut scheduler = Scheduler::new();
        let mut engine = engine();
        engine.set_target(
            &TargetSpec::Selector("#go".into()),
            &mut adapter,
            &mut scheduler,
            now,
        );
        let frame = engine.frame();

        adapter.remove_element("#go");
        assert!(!engine.adjust(&mut adapter));
        assert_eq!(engine.frame(), frame);
    }

    #[test]
    fn conclude_cancels_polls() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        let mut scheduler = Scheduler::new();
        let mut engine = engine();
        engine.set_target(
            &TargetSpec::Selector("#late".into()),
            &mut adapter,
            &mut scheduler,
            now,
        );
        assert_eq!(scheduler.len(), 1);

        engine.conclude(&mut scheduler);
        assert!(scheduler.is_empty());
        assert!(!engine.is_active());
    }

    #[test]
    fn frameless_target_counts_as_highlighted() {
        let now = Instant::now();
        let mut adapter = MockViewport::new();
        let mut scheduler = Scheduler::new();
        let mut engine = engine();
        engine.set_target(&TargetSpec::Frameless, &mut adapter, &mut scheduler, now);
        assert!(engine.is_active());
        assert_eq!(engine.frame(), None);
        assert!(scheduler.is_empty());
    }
}

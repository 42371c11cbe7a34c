#![forbid(unsafe_code)]

//! Test doubles: a scripted [`MockViewport`] adapter and a [`ManualClock`].
//!
//! The mock records every visual mutation as a [`MockOp`] so tests can
//! assert on the exact sequence the engine drove, and lets tests script
//! element appearance and movement between pumps.

use usher_core::{Placement, Rect, ScrollTarget, Size, Viewport};
use web_time::{Duration, Instant};

use crate::adapter::{FrameUpdate, ViewportAdapter};

/// Opaque element handle handed out by [`MockViewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockElement(u32);

/// A recorded adapter mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    Navigate(String),
    ScrollTo(ScrollTarget),
    OverlayActive(bool),
    HighlightVisible(bool),
    OverlayClasses(Vec<String>),
    Frame(FrameUpdate),
    PlaceBox(Placement),
    BoxVisible(bool),
    AnchoredBoxVisible(bool),
    Animation(Option<String>),
    ShowCountdown(Duration),
    PauseCountdown,
    HideCountdown,
}

/// A scriptable in-memory page.
#[derive(Debug)]
pub struct MockViewport {
    elements: Vec<(String, MockElement, Rect)>,
    next_id: u32,
    /// Scroll offset and visible size reported to the engine.
    pub viewport: Viewport,
    /// Document body size reported to the engine.
    pub body: Size,
    /// Floating box footprint reported to the engine.
    pub box_size: Size,
    /// Current URL; `navigate` overwrites it.
    pub url: String,
    ops: Vec<MockOp>,
}

impl Default for MockViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockViewport {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 0,
            viewport: Viewport::new(0.0, 0.0, 800.0, 600.0),
            body: Size::new(1000.0, 2000.0),
            box_size: Size::new(200.0, 100.0),
            url: "https://example.test/tour".to_string(),
            ops: Vec::new(),
        }
    }

    /// Add an element the engine can resolve by `selector`.
    pub fn insert_element(&mut self, selector: impl Into<String>, rect: Rect) -> MockElement {
        let element = MockElement(self.next_id);
        self.next_id += 1;
        self.elements.push((selector.into(), element, rect));
        element
    }

    /// Move an existing element. No-op if the selector is unknown.
    pub fn move_element(&mut self, selector: &str, rect: Rect) {
        if let Some(entry) = self.elements.iter_mut().find(|(sel, _, _)| sel == selector) {
            entry.2 = rect;
        }
    }

    /// Remove an element from the page.
    pub fn remove_element(&mut self, selector: &str) {
        self.elements.retain(|(sel, _, _)| sel != selector);
    }

    /// Every mutation recorded so far, in call order.
    pub fn ops(&self) -> &[MockOp] {
        &self.ops
    }

    /// Forget recorded mutations.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Count recorded mutations matching a predicate.
    pub fn count_ops(&self, matches: impl Fn(&MockOp) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }
}

impl ViewportAdapter for MockViewport {
    type Element = MockElement;

    fn query(&self, selector: &str) -> Option<MockElement> {
        self.elements
            .iter()
            .find(|(sel, _, _)| sel == selector)
            .map(|(_, element, _)| *element)
    }

    fn measure(&self, element: &MockElement) -> Option<Rect> {
        self.elements
            .iter()
            .find(|(_, el, _)| el == element)
            .map(|(_, _, rect)| *rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn body_size(&self) -> Size {
        self.body
    }

    fn step_box_size(&self) -> Size {
        self.box_size
    }

    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn navigate(&mut self, url: &str) {
        self.url = url.to_string();
        self.ops.push(MockOp::Navigate(url.to_string()));
    }

    fn scroll_to(&mut self, target: ScrollTarget, _duration: Duration) {
        self.viewport.scroll_left = target.left;
        self.viewport.scroll_top = target.top;
        self.ops.push(MockOp::ScrollTo(target));
    }

    fn set_overlay_active(&mut self, active: bool) {
        self.ops.push(MockOp::OverlayActive(active));
    }

    fn set_highlight_visible(&mut self, visible: bool) {
        self.ops.push(MockOp::HighlightVisible(visible));
    }

    fn set_overlay_classes(&mut self, classes: &[String]) {
        self.ops.push(MockOp::OverlayClasses(classes.to_vec()));
    }

    fn update_frame(&mut self, update: FrameUpdate) {
        self.ops.push(MockOp::Frame(update));
    }

    fn place_box(&mut self, placement: &Placement) {
        self.ops.push(MockOp::PlaceBox(*placement));
    }

    fn set_box_visible(&mut self, visible: bool) {
        self.ops.push(MockOp::BoxVisible(visible));
    }

    fn set_anchored_box_visible(&mut self, visible: bool) {
        self.ops.push(MockOp::AnchoredBoxVisible(visible));
    }

    fn set_box_animation(&mut self, animation: Option<&str>) {
        self.ops.push(MockOp::Animation(animation.map(str::to_string)));
    }

    fn show_countdown(&mut self, duration: Duration) {
        self.ops.push(MockOp::ShowCountdown(duration));
    }

    fn pause_countdown(&mut self) {
        self.ops.push(MockOp::PauseCountdown);
    }

    fn hide_countdown(&mut self) {
        self.ops.push(MockOp::HideCountdown);
    }
}

/// A clock tests advance by hand.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: Instant,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance the clock and return the new instant.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_resolve_and_measure() {
        let mut page = MockViewport::new();
        assert_eq!(page.query("#go"), None);
        let element = page.insert_element("#go", Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(page.query("#go"), Some(element));
        assert_eq!(page.measure(&element), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));

        page.move_element("#go", Rect::new(9.0, 9.0, 3.0, 4.0));
        assert_eq!(page.measure(&element), Some(Rect::new(9.0, 9.0, 3.0, 4.0)));

        page.remove_element("#go");
        assert_eq!(page.query("#go"), None);
        assert_eq!(page.measure(&element), None);
    }

    #[test]
    fn scroll_updates_reported_viewport() {
        let mut page = MockViewport::new();
        page.scroll_to(ScrollTarget { left: 10.0, top: 300.0 }, Duration::ZERO);
        assert_eq!(page.viewport().scroll_top, 300.0);
        assert_eq!(
            page.ops(),
            &[MockOp::ScrollTo(ScrollTarget { left: 10.0, top: 300.0 })]
        );
    }

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new();
        let start = clock.now();
        let later = clock.advance(Duration::from_millis(250));
        assert_eq!(later - start, Duration::from_millis(250));
    }
}

#![forbid(unsafe_code)]

//! Step definitions.
//!
//! A [`Step`] bundles what to show (content, target, position) with how to
//! behave (navigation gates, auto-advance predicate, countdown, hooks).
//! Construction is builder-style; every field has a usable default so a
//! bare `Step::new()` is a valid screen-centered step once content is set.

use std::fmt;

use usher_core::{Position, ResolvedPosition};
use web_time::Duration;

/// What a step highlights.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec<E> {
    /// Nothing to highlight; the step floats per its position directive.
    None,
    /// Look the target up by selector. Resolution may be deferred if the
    /// element does not exist yet.
    Selector(String),
    /// A pre-resolved element handle.
    Element(E),
    /// Deliberately frameless: the step counts as targeted but the
    /// highlight collapses to zero size.
    Frameless,
}

impl<E> Default for TargetSpec<E> {
    fn default() -> Self {
        Self::None
    }
}

impl<E> TargetSpec<E> {
    /// Whether this spec names a target at all. An empty selector counts
    /// as no target.
    pub fn is_present(&self) -> bool {
        match self {
            Self::None => false,
            Self::Selector(sel) => !sel.is_empty(),
            Self::Element(_) | Self::Frameless => true,
        }
    }
}

/// A navigation gate for next/prev on a single step.
pub enum Gate<E> {
    /// Fall back to the tour-wide setting.
    Default,
    /// Always allow.
    Allow,
    /// Always deny (unless forced).
    Deny,
    /// Ask at the moment of navigation.
    Predicate(Box<dyn Fn(&Step<E>) -> bool>),
}

impl<E> Default for Gate<E> {
    fn default() -> Self {
        Self::Default
    }
}

impl<E> fmt::Debug for Gate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Gate::Default"),
            Self::Allow => write!(f, "Gate::Allow"),
            Self::Deny => write!(f, "Gate::Deny"),
            Self::Predicate(_) => write!(f, "Gate::Predicate(..)"),
        }
    }
}

/// A lifecycle hook. Receives the step's index and definition; it cannot
/// re-enter the tour.
pub type StepHook<E> = Box<dyn Fn(usize, &Step<E>)>;

/// Hook run when a step concludes. May return a delay to hold the current
/// display before the transition applies.
pub type FinishHook<E> = Box<dyn Fn(usize, &Step<E>) -> Option<Duration>>;

/// Predicate polled for automatic advancement.
pub type AutoNextPredicate = Box<dyn Fn() -> bool>;

/// Per-step lifecycle hooks. Any hook set here shadows the tour-wide one.
pub struct StepHooks<E> {
    pub on_change: Option<StepHook<E>>,
    pub on_start: Option<StepHook<E>>,
    pub on_stop: Option<StepHook<E>>,
    pub on_pause: Option<StepHook<E>>,
    pub on_resume: Option<StepHook<E>>,
    pub on_close: Option<StepHook<E>>,
    pub on_finish: Option<FinishHook<E>>,
}

// Manual impl: deriving would bound `E: Default`, which element handles
// need not satisfy.
impl<E> Default for StepHooks<E> {
    fn default() -> Self {
        Self {
            on_change: None,
            on_start: None,
            on_stop: None,
            on_pause: None,
            on_resume: None,
            on_close: None,
            on_finish: None,
        }
    }
}

impl<E> fmt::Debug for StepHooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHooks")
            .field("on_change", &self.on_change.is_some())
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .field("on_pause", &self.on_pause.is_some())
            .field("on_resume", &self.on_resume.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

/// One step of a tour.
pub struct Step<E> {
    /// Content shown in the step box. Required unless the position makes
    /// the step valid without it.
    pub content: Option<String>,
    /// What to highlight.
    pub target: TargetSpec<E>,
    /// Requested position; `None` falls back to the tour default.
    pub position: Option<Position>,
    /// Countdown before auto-advance, in milliseconds. Values below 100
    /// are interpreted as whole seconds. `None` falls back to the tour
    /// default; zero disables the countdown.
    pub duration_ms: Option<u64>,
    /// Extra classes applied to the overlay while this step is shown.
    pub classes: Vec<String>,
    /// Entry animation name for the step box.
    pub animation: Option<String>,
    /// Navigate here before showing the step.
    pub url: Option<String>,
    /// Gate for advancing past this step.
    pub allow_next: Gate<E>,
    /// Gate for going back from this step.
    pub allow_prev: Gate<E>,
    /// When set, the step advances on its own once the predicate holds.
    pub auto_next: Option<AutoNextPredicate>,
    /// Per-step hook overrides.
    pub hooks: StepHooks<E>,
    /// Per-step visibility overrides for the navigation row.
    pub show_navigation: Option<bool>,
    pub show_close: Option<bool>,
    pub show_header: Option<bool>,
    /// Per-step label overrides.
    pub prev_label: Option<String>,
    pub next_label: Option<String>,
    pub finish_label: Option<String>,
    pub close_label: Option<String>,
    pub header_template: Option<String>,

    /// Concrete position of the last display, written by the engine.
    pub(crate) resolved_position: Option<ResolvedPosition>,
    /// URL recorded when the step was first shown without one of its own,
    /// so revisiting navigates back.
    pub(crate) previous_url: Option<String>,
}

impl<E> Default for Step<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Step<E> {
    pub fn new() -> Self {
        Self {
            content: None,
            target: TargetSpec::None,
            position: None,
            duration_ms: None,
            classes: Vec::new(),
            animation: None,
            url: None,
            allow_next: Gate::Default,
            allow_prev: Gate::Default,
            auto_next: None,
            hooks: StepHooks::default(),
            show_navigation: None,
            show_close: None,
            show_header: None,
            prev_label: None,
            next_label: None,
            finish_label: None,
            close_label: None,
            header_template: None,
            resolved_position: None,
            previous_url: None,
        }
    }

    /// The concrete position this step resolved to on its last display.
    pub fn resolved_position(&self) -> Option<ResolvedPosition> {
        self.resolved_position
    }

    // ── Builder ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn target_selector(mut self, selector: impl Into<String>) -> Self {
        self.target = TargetSpec::Selector(selector.into());
        self
    }

    #[must_use]
    pub fn target_element(mut self, element: E) -> Self {
        self.target = TargetSpec::Element(element);
        self
    }

    #[must_use]
    pub fn frameless_target(mut self) -> Self {
        self.target = TargetSpec::Frameless;
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn duration_ms(mut self, millis: u64) -> Self {
        self.duration_ms = Some(millis);
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn allow_next(mut self, allow: bool) -> Self {
        self.allow_next = if allow { Gate::Allow } else { Gate::Deny };
        self
    }

    #[must_use]
    pub fn allow_next_if(mut self, predicate: impl Fn(&Step<E>) -> bool + 'static) -> Self {
        self.allow_next = Gate::Predicate(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn allow_prev(mut self, allow: bool) -> Self {
        self.allow_prev = if allow { Gate::Allow } else { Gate::Deny };
        self
    }

    #[must_use]
    pub fn allow_prev_if(mut self, predicate: impl Fn(&Step<E>) -> bool + 'static) -> Self {
        self.allow_prev = Gate::Predicate(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn auto_next(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.auto_next = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn on_change(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_change = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_start(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_start = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_stop(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_stop = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_pause(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_pause = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_resume(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_resume = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_close(mut self, hook: impl Fn(usize, &Step<E>) + 'static) -> Self {
        self.hooks.on_close = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_finish(
        mut self,
        hook: impl Fn(usize, &Step<E>) -> Option<Duration> + 'static,
    ) -> Self {
        self.hooks.on_finish = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn show_navigation(mut self, show: bool) -> Self {
        self.show_navigation = Some(show);
        self
    }

    #[must_use]
    pub fn show_close(mut self, show: bool) -> Self {
        self.show_close = Some(show);
        self
    }

    #[must_use]
    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = Some(show);
        self
    }

    #[must_use]
    pub fn prev_label(mut self, label: impl Into<String>) -> Self {
        self.prev_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn next_label(mut self, label: impl Into<String>) -> Self {
        self.next_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn finish_label(mut self, label: impl Into<String>) -> Self {
        self.finish_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.close_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn header_template(mut self, template: impl Into<String>) -> Self {
        self.header_template = Some(template.into());
        self
    }
}

impl<E: fmt::Debug> fmt::Debug for Step<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("content", &self.content)
            .field("target", &self.target)
            .field("position", &self.position)
            .field("duration_ms", &self.duration_ms)
            .field("url", &self.url)
            .field("allow_next", &self.allow_next)
            .field("allow_prev", &self.allow_prev)
            .field("auto_next", &self.auto_next.is_some())
            .field("hooks", &self.hooks)
            .field("resolved_position", &self.resolved_position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type S = Step<u32>;

    #[test]
    fn default_step_is_bare() {
        let step = S::new();
        assert_eq!(step.content, None);
        assert_eq!(step.target, TargetSpec::None);
        assert!(!step.target.is_present());
        assert!(matches!(step.allow_next, Gate::Default));
    }

    #[test]
    fn defaults_need_no_default_element() {
        // Element handles carry no Default; construction must not ask
        // for one.
        struct Handle;
        let hooks: StepHooks<Handle> = StepHooks::default();
        assert!(hooks.on_change.is_none());
        assert!(hooks.on_finish.is_none());
        let step: Step<Handle> = Step::new();
        assert!(step.content.is_none());
        assert!(!TargetSpec::<Handle>::default().is_present());
    }

    #[test]
    fn empty_selector_counts_as_no_target() {
        assert!(!TargetSpec::<u32>::Selector(String::new()).is_present());
        assert!(TargetSpec::<u32>::Selector("#go".into()).is_present());
        assert!(TargetSpec::<u32>::Frameless.is_present());
    }

    #[test]
    fn builder_sets_fields() {
        let step = S::new()
            .content("hello")
            .target_selector("#target")
            .position(Position::Bottom)
            .duration_ms(500)
            .class("intro")
            .allow_prev(false);
        assert_eq!(step.content.as_deref(), Some("hello"));
        assert_eq!(step.target, TargetSpec::Selector("#target".into()));
        assert_eq!(step.position, Some(Position::Bottom));
        assert_eq!(step.duration_ms, Some(500));
        assert_eq!(step.classes, vec!["intro".to_string()]);
        assert!(matches!(step.allow_prev, Gate::Deny));
    }

    #[test]
    fn hooks_register() {
        let step = S::new().on_start(|_, _| {}).on_finish(|_, _| None);
        assert!(step.hooks.on_start.is_some());
        assert!(step.hooks.on_finish.is_some());
        assert!(step.hooks.on_stop.is_none());
    }
}

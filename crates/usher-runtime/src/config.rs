#![forbid(unsafe_code)]

//! Tour-wide configuration.
//!
//! Most settings here are per-step overridable; the step value wins when
//! set. Hooks registered here fire for every step unless the step carries
//! its own.

use std::fmt;

use usher_core::{Position, Sides};
use web_time::Duration;

use crate::step::{FinishHook, StepHook};

/// Entry animations the engine will apply to the step box. Anything else
/// is ignored.
pub const ALLOWED_ANIMATIONS: &[&str] = &[
    "flash",
    "bounce",
    "shake",
    "tada",
    "fadeIn",
    "fadeInUp",
    "fadeInDown",
    "fadeInLeft",
    "fadeInRight",
    "fadeInUpBig",
    "fadeInDownBig",
    "fadeInLeftBig",
    "fadeInRightBig",
    "bounceIn",
    "bounceInDown",
    "bounceInUp",
    "bounceInLeft",
    "bounceInRight",
    "rotateIn",
    "rotateInDownLeft",
    "rotateInDownRight",
    "rotateInUpLeft",
    "rotateInUpRight",
];

/// Whether `name` is an animation the engine will apply.
pub fn is_allowed_animation(name: &str) -> bool {
    ALLOWED_ANIMATIONS.contains(&name)
}

/// Tour-wide lifecycle hooks. A step's own hook of the same kind shadows
/// the tour-wide one for that step.
pub struct TourHooks<E> {
    /// The tour was started.
    pub on_tour_start: Option<StepHook<E>>,
    /// The tour ended, by finishing past the last step or by stopping.
    pub on_tour_end: Option<StepHook<E>>,
    /// The user asked to close the tour.
    pub on_tour_close: Option<StepHook<E>>,
    /// The dimming overlay was clicked.
    pub on_overlay_click: Option<StepHook<E>>,
    pub on_step_change: Option<StepHook<E>>,
    pub on_step_start: Option<StepHook<E>>,
    pub on_step_stop: Option<StepHook<E>>,
    pub on_step_pause: Option<StepHook<E>>,
    pub on_step_resume: Option<StepHook<E>>,
    pub on_step_finish: Option<FinishHook<E>>,
}

// Manual impl: deriving would bound `E: Default`, which element handles
// need not satisfy.
impl<E> Default for TourHooks<E> {
    fn default() -> Self {
        Self {
            on_tour_start: None,
            on_tour_end: None,
            on_tour_close: None,
            on_overlay_click: None,
            on_step_change: None,
            on_step_start: None,
            on_step_stop: None,
            on_step_pause: None,
            on_step_resume: None,
            on_step_finish: None,
        }
    }
}

impl<E> fmt::Debug for TourHooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourHooks")
            .field("on_tour_start", &self.on_tour_start.is_some())
            .field("on_tour_end", &self.on_tour_end.is_some())
            .field("on_tour_close", &self.on_tour_close.is_some())
            .field("on_overlay_click", &self.on_overlay_click.is_some())
            .field("on_step_change", &self.on_step_change.is_some())
            .field("on_step_start", &self.on_step_start.is_some())
            .field("on_step_stop", &self.on_step_stop.is_some())
            .field("on_step_pause", &self.on_step_pause.is_some())
            .field("on_step_resume", &self.on_step_resume.is_some())
            .field("on_step_finish", &self.on_step_finish.is_some())
            .finish()
    }
}

/// Configuration for a [`Tour`](crate::Tour).
///
/// [`Default`] matches the stock behavior: start at step zero, auto
/// placement, key bindings on, invalid steps skipped rather than aborting.
pub struct TourConfig<E> {
    /// Index of the step shown when the tour starts.
    pub start_index: usize,
    /// Tour-wide countdown applied to steps without their own duration.
    /// `None` disables auto-advance by countdown.
    pub auto_countdown_ms: Option<u64>,
    /// Scroll the document back to the top when the tour finishes.
    pub scroll_to_top_on_finish: bool,
    /// React to keyboard navigation.
    pub enable_key_binding: bool,
    /// Stop the whole tour when an invalid step comes up, instead of
    /// skipping it.
    pub abort_on_invalid_step: bool,
    /// Delay before the overlay deactivates after a stop, letting exit
    /// animations run their course.
    pub deactivation_delay: Duration,
    /// Whether the host provides an anchored step container.
    pub has_anchored_container: bool,
    /// Position applied to steps without their own directive.
    pub default_position: Position,
    /// Apply entry animations to the step box.
    pub enable_animation: bool,
    /// Animation for steps without their own.
    pub default_animation: Option<String>,
    /// Duration passed to the adapter for scroll animations.
    pub scroll_duration: Duration,
    /// Padding between the highlighted element and the frame edges.
    pub highlight_padding: Sides,

    // Navigation defaults, per-step overridable.
    pub show_navigation: bool,
    pub show_close: bool,
    pub show_header: bool,
    pub allow_next: bool,
    pub allow_prev: bool,

    // Labels, per-step overridable.
    pub prev_label: String,
    pub next_label: String,
    pub finish_label: String,
    pub close_label: String,
    /// Header text with `{{step}}` and `{{steps}}` placeholders. The
    /// engine passes it through untouched; substitution is the renderer's
    /// job, fed by the step number and count in the navigation state.
    pub header_template: String,

    pub hooks: TourHooks<E>,
}

impl<E> Default for TourConfig<E> {
    fn default() -> Self {
        Self {
            start_index: 0,
            auto_countdown_ms: None,
            scroll_to_top_on_finish: true,
            enable_key_binding: true,
            abort_on_invalid_step: false,
            deactivation_delay: Duration::from_millis(250),
            has_anchored_container: false,
            default_position: Position::Auto,
            enable_animation: true,
            default_animation: Some("fadeIn".to_string()),
            scroll_duration: Duration::from_millis(400),
            highlight_padding: Sides::all(5.0),
            show_navigation: true,
            show_close: true,
            show_header: true,
            allow_next: true,
            allow_prev: true,
            prev_label: "Prev".to_string(),
            next_label: "Next".to_string(),
            finish_label: "Finish".to_string(),
            close_label: "Close".to_string(),
            header_template: "{{step}}/{{steps}}".to_string(),
            hooks: TourHooks::default(),
        }
    }
}

impl<E> fmt::Debug for TourConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourConfig")
            .field("start_index", &self.start_index)
            .field("auto_countdown_ms", &self.auto_countdown_ms)
            .field("default_position", &self.default_position)
            .field("abort_on_invalid_step", &self.abort_on_invalid_step)
            .field("enable_key_binding", &self.enable_key_binding)
            .field("has_anchored_container", &self.has_anchored_container)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_behavior() {
        let config: TourConfig<u32> = TourConfig::default();
        assert_eq!(config.start_index, 0);
        assert_eq!(config.auto_countdown_ms, None);
        assert!(config.enable_key_binding);
        assert!(!config.abort_on_invalid_step);
        assert_eq!(config.default_position, Position::Auto);
        assert_eq!(config.deactivation_delay, Duration::from_millis(250));
        assert_eq!(config.highlight_padding, Sides::all(5.0));
    }

    #[test]
    fn defaults_need_no_default_element() {
        struct Handle;
        let config: TourConfig<Handle> = TourConfig::default();
        assert!(config.hooks.on_tour_start.is_none());
        assert!(config.hooks.on_step_finish.is_none());
    }

    #[test]
    fn animation_whitelist() {
        assert!(is_allowed_animation("fadeIn"));
        assert!(is_allowed_animation("rotateInUpRight"));
        assert!(!is_allowed_animation("spin"));
        assert!(!is_allowed_animation(""));
    }
}

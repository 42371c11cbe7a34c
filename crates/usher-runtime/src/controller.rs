#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! A [`Tour`] owns the adapter, the step list, and every timing concern.
//! The host feeds it user intents (`next`, `prev`, `handle_key`, ...) and
//! pumps [`Tour::tick`] with the current instant; everything else —
//! countdowns, deferred lookups, highlight tracking, delayed transitions —
//! runs off the internal scheduler.
//!
//! # Invariants
//!
//! 1. `current_index` always names a step; transitions clamp or no-op at
//!    the ends instead of running out of range.
//! 2. Concluding a step cancels every handle it registered. A task from a
//!    previous step never fires into the next one.
//! 3. User hooks run behind a panic boundary and cannot re-enter the tour.
//!
//! # Failure Modes
//!
//! An invalid step is reported through `tracing` and either skipped in the
//! travel direction or, with `abort_on_invalid_step`, stops the tour.

use std::panic::{AssertUnwindSafe, catch_unwind};

use usher_core::{
    Position, PositionResolver, ResolveContext, ResolvedPosition, Scheduler, ScrollPlanner,
    ScrollTarget, TaskId, Timer,
};
use web_time::{Duration, Instant};

use crate::adapter::{FrameUpdate, ViewportAdapter};
use crate::auto_advance::{AutoAdvancePoller, eval_auto_next};
use crate::config::{TourConfig, is_allowed_animation};
use crate::error::{ConfigError, InvalidStepReason};
use crate::highlight::HighlightEngine;
use crate::step::{Gate, Step, StepHook};
use crate::tasks::{RESIZE_DEBOUNCE, TaskKind, TransitionGoal};

/// Where the tour currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started, stopped, or finished.
    Idle,
    /// A step is on screen awaiting manual advance.
    StepActive,
    /// A step is on screen with its countdown running.
    CountdownActive,
    /// Between steps, waiting out a finish-hook delay.
    Transitioning,
    /// Tearing down after running past the last step. Transient; the tour
    /// rests at `Idle` once finalization completes.
    Finished,
}

/// Travel direction, used by auto-advance and invalid-step skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Keyboard intents the host may forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Escape,
    Space,
}

/// What the navigation row should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub show_prev: bool,
    pub show_next: bool,
    pub show_close: bool,
    pub show_header: bool,
    pub is_last: bool,
    pub prev_label: String,
    /// Resolves to the finish label on the last step.
    pub next_label: String,
    pub close_label: String,
    /// Header text with `{{step}}`/`{{steps}}` placeholders still in it.
    pub header_template: String,
    /// One-based, for display.
    pub step_number: usize,
    pub step_count: usize,
}

#[derive(Debug, Clone, Copy)]
enum HookKind {
    Change,
    Start,
    Stop,
    Pause,
    Resume,
}

impl HookKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Change => "on_step_change",
            Self::Start => "on_step_start",
            Self::Stop => "on_step_stop",
            Self::Pause => "on_step_pause",
            Self::Resume => "on_step_resume",
        }
    }
}

/// Countdown values below this are whole seconds, not milliseconds.
const SECONDS_THRESHOLD_MS: u64 = 100;

fn normalize_duration(millis: u64) -> Duration {
    if millis < SECONDS_THRESHOLD_MS {
        Duration::from_secs(millis)
    } else {
        Duration::from_millis(millis)
    }
}

fn anchorless(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}

/// A guided tour over a host page.
pub struct Tour<A: ViewportAdapter> {
    adapter: A,
    steps: Vec<Step<A::Element>>,
    config: TourConfig<A::Element>,
    index: usize,
    direction: Direction,
    phase: Phase,
    scheduler: Scheduler<TaskKind>,
    countdown: Option<Timer>,
    highlight: HighlightEngine<A::Element>,
    auto_advance: AutoAdvancePoller,
    resolver: PositionResolver,
    scroll_planner: ScrollPlanner,
    rescroll_allowed: bool,
    keys_frozen: bool,
    pending_transition: Option<TaskId>,
    rescroll_task: Option<TaskId>,
    deactivation_task: Option<TaskId>,
}

impl<A: ViewportAdapter> Tour<A> {
    /// Build a tour. Fails when the step list is empty or the configured
    /// start index names no step.
    pub fn new(
        adapter: A,
        steps: Vec<Step<A::Element>>,
        config: TourConfig<A::Element>,
    ) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptySteps);
        }
        if config.start_index >= steps.len() {
            return Err(ConfigError::StartIndexOutOfRange {
                index: config.start_index,
                len: steps.len(),
            });
        }
        let highlight = HighlightEngine::new(config.highlight_padding);
        let index = config.start_index;
        Ok(Self {
            adapter,
            steps,
            config,
            index,
            direction: Direction::Forward,
            phase: Phase::Idle,
            scheduler: Scheduler::new(),
            countdown: None,
            highlight,
            auto_advance: AutoAdvancePoller::default(),
            resolver: PositionResolver::default(),
            scroll_planner: ScrollPlanner::default(),
            rescroll_allowed: false,
            keys_frozen: false,
            pending_transition: None,
            rescroll_task: None,
            deactivation_task: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> &Step<A::Element> {
        &self.steps[self.index]
    }

    pub fn steps(&self) -> &[Step<A::Element>] {
        &self.steps
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == self.steps.len() - 1
    }

    /// Whether advancing is currently allowed, per the step gate or the
    /// tour default. A panicking gate predicate denies.
    pub fn is_next_allowed(&self) -> bool {
        let step = &self.steps[self.index];
        Self::gate_allows(&step.allow_next, self.config.allow_next, step)
    }

    pub fn is_prev_allowed(&self) -> bool {
        let step = &self.steps[self.index];
        Self::gate_allows(&step.allow_prev, self.config.allow_prev, step)
    }

    /// Snapshot of what the navigation row should show for this step.
    pub fn nav_state(&self) -> NavState {
        let step = &self.steps[self.index];
        let show_navigation = step.show_navigation.unwrap_or(self.config.show_navigation);
        let is_last = self.is_last();
        let next_label = if is_last {
            step.finish_label
                .clone()
                .unwrap_or_else(|| self.config.finish_label.clone())
        } else {
            step.next_label
                .clone()
                .unwrap_or_else(|| self.config.next_label.clone())
        };
        NavState {
            show_prev: show_navigation && !self.is_first() && self.is_prev_allowed(),
            show_next: show_navigation,
            show_close: step.show_close.unwrap_or(self.config.show_close),
            show_header: step.show_header.unwrap_or(self.config.show_header),
            is_last,
            prev_label: step
                .prev_label
                .clone()
                .unwrap_or_else(|| self.config.prev_label.clone()),
            next_label,
            close_label: step
                .close_label
                .clone()
                .unwrap_or_else(|| self.config.close_label.clone()),
            header_template: step
                .header_template
                .clone()
                .unwrap_or_else(|| self.config.header_template.clone()),
            step_number: self.index + 1,
            step_count: self.steps.len(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start (or restart) the tour at the configured start index.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            self.conclude_current();
            self.stop_countdown();
        }
        if let Some(id) = self.deactivation_task.take() {
            self.scheduler.cancel(id);
        }
        self.index = self.config.start_index;
        self.direction = Direction::Forward;
        self.rescroll_allowed = false;
        self.adapter.set_overlay_active(true);
        self.phase = Phase::StepActive;
        tracing::debug!(step = self.index, "tour started");
        self.emit_tour_hook(|hooks| hooks.on_tour_start.as_ref(), "on_tour_start");
        self.run(now);
    }

    /// Stop the tour, tearing down visuals and every scheduled handle.
    pub fn stop(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            return;
        }
        self.stop_countdown();
        self.adapter.hide_countdown();
        self.conclude_current();

        self.adapter.set_highlight_visible(false);
        self.adapter.update_frame(FrameUpdate::Hidden);
        self.adapter.set_box_visible(false);
        self.adapter.set_anchored_box_visible(false);

        self.emit_step_hook(HookKind::Stop);
        self.emit_tour_hook(|hooks| hooks.on_tour_end.as_ref(), "on_tour_end");
        tracing::debug!(step = self.index, "tour stopped");

        self.index = self.config.start_index;
        self.deactivate(now);
        self.phase = Phase::Idle;
    }

    /// Advance to the next step, or finish the tour on the last one.
    /// `force` bypasses the navigation gate.
    pub fn next(&mut self, force: bool, now: Instant) {
        if !self.is_running_phase() {
            return;
        }
        if !force && !self.is_next_allowed() {
            return;
        }
        self.direction = Direction::Forward;
        let goal = if self.is_last() {
            TransitionGoal::Finalize
        } else {
            TransitionGoal::Run(self.index + 1)
        };
        self.begin_transition(goal, now);
    }

    /// Go back one step. On the first step the step re-runs instead.
    pub fn prev(&mut self, force: bool, now: Instant) {
        if !self.is_running_phase() {
            return;
        }
        if !force && !self.is_prev_allowed() {
            return;
        }
        self.direction = Direction::Backward;
        let target = if self.is_first() {
            self.index
        } else {
            self.index - 1
        };
        self.begin_transition(TransitionGoal::Run(target), now);
    }

    /// Jump to an arbitrary step, concluding the current one first.
    /// Out-of-range indices are ignored.
    pub fn move_to(&mut self, index: usize, now: Instant) {
        if !self.is_running_phase() || index >= self.steps.len() {
            return;
        }
        self.begin_transition(TransitionGoal::Run(index), now);
    }

    /// Pause a running countdown. No-op otherwise.
    pub fn pause(&mut self, now: Instant) {
        if self.phase != Phase::CountdownActive {
            return;
        }
        let Some(timer) = self.countdown.as_mut() else {
            return;
        };
        timer.pause(now);
        self.adapter.pause_countdown();
        self.phase = Phase::StepActive;
        self.emit_step_hook(HookKind::Pause);
    }

    /// Resume a paused countdown for its remaining time. No-op otherwise.
    pub fn resume(&mut self, now: Instant) {
        if self.phase == Phase::CountdownActive {
            return;
        }
        let Some(timer) = self.countdown.as_mut() else {
            return;
        };
        let remaining = timer.resume(now);
        if remaining.is_zero() {
            return;
        }
        self.adapter.show_countdown(remaining);
        self.phase = Phase::CountdownActive;
        self.emit_step_hook(HookKind::Resume);
    }

    // ── Host events ──────────────────────────────────────────────────────

    /// Pump the engine. Fires due scheduler tasks and the countdown.
    pub fn tick(&mut self, now: Instant) {
        for task in self.scheduler.fire_due(now) {
            self.dispatch(task, now);
        }
        if let Some(timer) = self.countdown.as_mut()
            && timer.poll(now)
        {
            self.countdown = None;
            self.phase = Phase::StepActive;
            self.next(false, now);
        }
    }

    /// Forward a keyboard intent. Ignored while idle, frozen, or when key
    /// bindings are disabled.
    pub fn handle_key(&mut self, key: NavKey, now: Instant) {
        if !self.config.enable_key_binding || self.keys_frozen || self.phase == Phase::Idle {
            return;
        }
        match key {
            NavKey::Escape => self.stop(now),
            NavKey::ArrowLeft | NavKey::ArrowUp => self.prev(false, now),
            NavKey::ArrowRight | NavKey::ArrowDown => self.next(false, now),
            NavKey::Space => {
                if self.phase == Phase::CountdownActive {
                    self.pause(now);
                } else {
                    self.resume(now);
                }
            }
        }
    }

    /// Temporarily ignore keyboard intents without unbinding them.
    pub fn set_keys_frozen(&mut self, frozen: bool) {
        self.keys_frozen = frozen;
    }

    /// The viewport was resized. Recomputes geometry immediately, re-arms
    /// re-scrolling, and scrolls the highlight back into view after a
    /// debounce so resize bursts coalesce into one scroll.
    pub fn handle_resize(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            return;
        }
        // Track the reflowed element right away; the scroll follows later.
        if self.highlight.adjust(&mut self.adapter) {
            self.reposition_box();
        }
        self.rescroll_allowed = true;
        if let Some(id) = self.rescroll_task.take() {
            self.scheduler.cancel(id);
        }
        self.rescroll_task = Some(self.scheduler.schedule_once(
            now,
            RESIZE_DEBOUNCE,
            TaskKind::RescrollAfterResize,
        ));
    }

    /// The user scrolled by hand; stop fighting them until the next
    /// highlight change.
    pub fn handle_user_scroll(&mut self) {
        self.rescroll_allowed = false;
    }

    /// The dimming overlay was clicked.
    pub fn overlay_clicked(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.emit_tour_hook(|hooks| hooks.on_overlay_click.as_ref(), "on_overlay_click");
    }

    /// The user asked to close the tour.
    pub fn close_requested(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            return;
        }
        {
            let step = &self.steps[self.index];
            let hook = step
                .hooks
                .on_close
                .as_ref()
                .or(self.config.hooks.on_tour_close.as_ref());
            if let Some(hook) = hook {
                Self::run_hook(hook, self.index, step, "on_tour_close");
            }
        }
        self.stop(now);
    }

    // ── Transitions ──────────────────────────────────────────────────────

    fn is_running_phase(&self) -> bool {
        matches!(self.phase, Phase::StepActive | Phase::CountdownActive)
    }

    fn advance_in_direction(&mut self, now: Instant) {
        match self.direction {
            Direction::Forward => self.next(false, now),
            Direction::Backward => self.prev(false, now),
        }
    }

    /// Conclude the current step and move toward `goal`, honoring a delay
    /// returned by the finish hook.
    fn begin_transition(&mut self, goal: TransitionGoal, now: Instant) {
        self.conclude_current();
        self.stop_countdown();
        let delay = self.emit_finish().unwrap_or(Duration::ZERO);
        if delay.is_zero() {
            self.apply_transition(goal, now);
        } else {
            self.phase = Phase::Transitioning;
            self.pending_transition =
                Some(
                    self.scheduler
                        .schedule_once(now, delay, TaskKind::Transition(goal)),
                );
        }
    }

    fn apply_transition(&mut self, goal: TransitionGoal, now: Instant) {
        self.pending_transition = None;
        match goal {
            TransitionGoal::Run(index) => {
                tracing::debug!(from = self.index, to = index, "step transition");
                self.index = index;
                self.phase = Phase::StepActive;
                self.run(now);
            }
            TransitionGoal::Finalize => self.finalize(now),
        }
    }

    /// Cancel every handle the current step registered.
    fn conclude_current(&mut self) {
        self.auto_advance.disarm(&mut self.scheduler);
        self.highlight.conclude(&mut self.scheduler);
        if let Some(id) = self.pending_transition.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.rescroll_task.take() {
            self.scheduler.cancel(id);
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(timer) = self.countdown.as_mut() {
            timer.stop();
        }
        self.countdown = None;
    }

    /// Tear down after running past the last step.
    fn finalize(&mut self, now: Instant) {
        self.phase = Phase::Finished;
        self.stop_countdown();
        self.adapter.hide_countdown();
        self.adapter.set_box_visible(false);
        self.adapter.set_anchored_box_visible(false);
        self.adapter.set_highlight_visible(false);
        self.adapter.update_frame(FrameUpdate::Hidden);

        if self.config.scroll_to_top_on_finish {
            self.adapter
                .scroll_to(ScrollTarget::default(), self.config.scroll_duration);
        }

        self.emit_tour_hook(|hooks| hooks.on_tour_end.as_ref(), "on_tour_end");
        tracing::debug!("tour finished");

        self.index = self.config.start_index;
        self.deactivate(now);
        self.phase = Phase::Idle;
    }

    fn deactivate(&mut self, now: Instant) {
        if let Some(id) = self.deactivation_task.take() {
            self.scheduler.cancel(id);
        }
        self.deactivation_task = Some(self.scheduler.schedule_once(
            now,
            self.config.deactivation_delay,
            TaskKind::Deactivate,
        ));
    }

    // ── Step execution ───────────────────────────────────────────────────

    /// Run the step at the current index: URL gate, auto-advance
    /// pre-check, validation, display, countdown, hooks.
    fn run(&mut self, now: Instant) {
        let effective_url = {
            let step = &self.steps[self.index];
            step.url.clone().or_else(|| step.previous_url.clone())
        };
        match effective_url {
            Some(url) => {
                let current = self.adapter.current_url();
                if url != current {
                    self.adapter.navigate(&url);
                }
                if anchorless(&url) != anchorless(&current) {
                    // Full page load under way; the new page restarts us.
                    return;
                }
            }
            None => {
                let current = self.adapter.current_url();
                self.steps[self.index].previous_url = Some(current);
            }
        }

        // Skip the step outright if its advance condition already holds.
        let satisfied = {
            let step = &self.steps[self.index];
            step.auto_next
                .as_ref()
                .is_some_and(|predicate| eval_auto_next(predicate))
        };
        if satisfied && !(self.direction == Direction::Backward && self.is_first()) {
            self.advance_in_direction(now);
            return;
        }

        if let Some(reason) = self.validate_current() {
            tracing::error!(step = self.index, %reason, "invalid step");
            if self.config.abort_on_invalid_step
                || (self.direction == Direction::Backward && self.is_first())
            {
                // Going backward from the first step would re-run the same
                // invalid step forever.
                self.stop(now);
                return;
            }
            self.advance_in_direction(now);
            return;
        }

        self.show_step(now);
        self.rescroll_allowed = true;

        let duration = {
            let step = &self.steps[self.index];
            step.duration_ms.or(self.config.auto_countdown_ms)
        };
        self.phase = Phase::StepActive;
        if let Some(millis) = duration {
            let countdown = normalize_duration(millis);
            if !countdown.is_zero() {
                self.adapter.show_countdown(countdown);
                self.countdown = Some(Timer::new(now, countdown));
                self.phase = Phase::CountdownActive;
            }
        }

        self.emit_step_hook(HookKind::Change);
        self.emit_step_hook(HookKind::Start);

        if self.steps[self.index].auto_next.is_some() {
            self.auto_advance.arm(&mut self.scheduler, now);
        }
    }

    fn validate_current(&self) -> Option<InvalidStepReason> {
        let step = &self.steps[self.index];
        let position = step.position.unwrap_or(self.config.default_position);

        if position.is_fixed() {
            return None;
        }
        // Auto with nothing to point at opts for the screen center.
        if position == Position::Auto && !step.target.is_present() {
            return None;
        }
        if position == Position::Anchor && self.config.has_anchored_container {
            return None;
        }
        if step.content.is_none() {
            return Some(InvalidStepReason::MissingContent);
        }
        if !step.target.is_present() {
            return Some(InvalidStepReason::MissingTarget);
        }
        None
    }

    fn show_step(&mut self, now: Instant) {
        let (classes, target, animation, requested) = {
            let step = &self.steps[self.index];
            (
                step.classes.clone(),
                step.target.clone(),
                step.animation.clone(),
                step.position.unwrap_or(self.config.default_position),
            )
        };

        self.adapter.set_overlay_classes(&classes);
        if self.config.enable_animation && requested != Position::Anchor {
            self.adapter.set_box_animation(None);
        }
        self.stop_countdown();
        self.adapter.hide_countdown();

        self.highlight
            .set_target(&target, &mut self.adapter, &mut self.scheduler, now);

        self.reposition_box();
        let resolved = self.steps[self.index]
            .resolved_position
            .unwrap_or(ResolvedPosition::ScreenCenter);

        if resolved == ResolvedPosition::Anchor {
            self.adapter.set_box_visible(false);
            self.adapter.set_anchored_box_visible(true);
        } else {
            self.adapter.set_anchored_box_visible(false);
            self.adapter.set_box_visible(true);
            if self.config.enable_animation {
                let animation = animation.or_else(|| self.config.default_animation.clone());
                if let Some(name) = animation
                    && is_allowed_animation(&name)
                {
                    self.adapter.set_box_animation(Some(&name));
                }
            }
        }

        self.scroll_into_view();
    }

    /// Recompute the box placement against the current highlight frame and
    /// push it to the adapter.
    fn reposition_box(&mut self) {
        let requested = {
            let step = &self.steps[self.index];
            step.position.unwrap_or(self.config.default_position)
        };
        let ctx = ResolveContext {
            frame: self.highlight.frame(),
            box_size: self.adapter.step_box_size(),
            body: self.adapter.body_size(),
            has_anchor: self.config.has_anchored_container,
        };
        let placement = self.resolver.resolve(requested, &ctx);
        self.steps[self.index].resolved_position = Some(placement.position);
        if placement.position != ResolvedPosition::Anchor {
            self.adapter.place_box(&placement);
        }
    }

    fn scroll_into_view(&mut self) {
        let Some(frame) = self.highlight.frame() else {
            return;
        };
        let Some(position) = self.steps[self.index].resolved_position else {
            return;
        };
        let target = self.scroll_planner.plan(
            frame,
            self.adapter.step_box_size(),
            position,
            self.adapter.viewport(),
        );
        if let Some(target) = target {
            self.adapter.scroll_to(target, self.config.scroll_duration);
        }
    }

    fn dispatch(&mut self, task: TaskKind, now: Instant) {
        match task {
            TaskKind::DeferredLookup => {
                if self
                    .highlight
                    .poll_lookup(&mut self.adapter, &mut self.scheduler, now)
                {
                    // A highlight change lifts manual-scroll suppression.
                    self.rescroll_allowed = true;
                    self.reposition_box();
                    self.scroll_into_view();
                }
            }
            TaskKind::HighlightAdjust => {
                if self.highlight.adjust(&mut self.adapter) {
                    self.reposition_box();
                    if self.rescroll_allowed {
                        self.scroll_into_view();
                    }
                }
            }
            TaskKind::AutoAdvance => {
                if !self.is_running_phase() {
                    return;
                }
                let satisfied = {
                    let step = &self.steps[self.index];
                    step.auto_next
                        .as_ref()
                        .is_some_and(|predicate| eval_auto_next(predicate))
                };
                if satisfied {
                    self.auto_advance.disarm(&mut self.scheduler);
                    self.advance_in_direction(now);
                }
            }
            TaskKind::Transition(goal) => self.apply_transition(goal, now),
            TaskKind::RescrollAfterResize => {
                self.rescroll_task = None;
                if self.rescroll_allowed {
                    self.scroll_into_view();
                }
            }
            TaskKind::Deactivate => {
                self.deactivation_task = None;
                self.adapter.set_overlay_active(false);
            }
        }
    }

    // ── Hooks ────────────────────────────────────────────────────────────

    fn run_hook(hook: &StepHook<A::Element>, index: usize, step: &Step<A::Element>, name: &str) {
        if catch_unwind(AssertUnwindSafe(|| hook(index, step))).is_err() {
            tracing::error!(step = index, hook = name, "hook panicked");
        }
    }

    fn emit_step_hook(&self, kind: HookKind) {
        let step = &self.steps[self.index];
        let hook = match kind {
            HookKind::Change => step
                .hooks
                .on_change
                .as_ref()
                .or(self.config.hooks.on_step_change.as_ref()),
            HookKind::Start => step
                .hooks
                .on_start
                .as_ref()
                .or(self.config.hooks.on_step_start.as_ref()),
            HookKind::Stop => step
                .hooks
                .on_stop
                .as_ref()
                .or(self.config.hooks.on_step_stop.as_ref()),
            HookKind::Pause => step
                .hooks
                .on_pause
                .as_ref()
                .or(self.config.hooks.on_step_pause.as_ref()),
            HookKind::Resume => step
                .hooks
                .on_resume
                .as_ref()
                .or(self.config.hooks.on_step_resume.as_ref()),
        };
        if let Some(hook) = hook {
            Self::run_hook(hook, self.index, step, kind.name());
        }
    }

    fn emit_tour_hook(
        &self,
        pick: impl Fn(&crate::config::TourHooks<A::Element>) -> Option<&StepHook<A::Element>>,
        name: &str,
    ) {
        if let Some(hook) = pick(&self.config.hooks) {
            Self::run_hook(hook, self.index, &self.steps[self.index], name);
        }
    }

    /// Run the finish hook for the concluding step, returning an optional
    /// delay to hold before the transition applies. A panic means no delay.
    fn emit_finish(&self) -> Option<Duration> {
        let step = &self.steps[self.index];
        let hook = step
            .hooks
            .on_finish
            .as_ref()
            .or(self.config.hooks.on_step_finish.as_ref())?;
        match catch_unwind(AssertUnwindSafe(|| hook(self.index, step))) {
            Ok(delay) => delay,
            Err(_) => {
                tracing::error!(step = self.index, "finish hook panicked");
                None
            }
        }
    }

    fn gate_allows(gate: &Gate<A::Element>, fallback: bool, step: &Step<A::Element>) -> bool {
        match gate {
            Gate::Default => fallback,
            Gate::Allow => true,
            Gate::Deny => false,
            Gate::Predicate(predicate) => {
                catch_unwind(AssertUnwindSafe(|| predicate(step))).unwrap_or_else(|_| {
                    tracing::error!("navigation gate panicked; denying");
                    false
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, MockViewport};

    fn simple_steps(count: usize) -> Vec<Step<crate::testing::MockElement>> {
        (0..count)
            .map(|i| Step::new().content(format!("step {i}")))
            .collect()
    }

    fn tour(count: usize) -> Tour<MockViewport> {
        Tour::new(MockViewport::new(), simple_steps(count), TourConfig::default()).unwrap()
    }

    #[test]
    fn empty_steps_rejected() {
        let result = Tour::new(MockViewport::new(), Vec::new(), TourConfig::default());
        assert_eq!(result.err(), Some(ConfigError::EmptySteps));
    }

    #[test]
    fn start_index_bounds_checked() {
        let config = TourConfig {
            start_index: 3,
            ..TourConfig::default()
        };
        let result = Tour::new(MockViewport::new(), simple_steps(3), config);
        assert_eq!(
            result.err(),
            Some(ConfigError::StartIndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn seconds_overload() {
        assert_eq!(normalize_duration(5), Duration::from_secs(5));
        assert_eq!(normalize_duration(99), Duration::from_secs(99));
        assert_eq!(normalize_duration(100), Duration::from_millis(100));
        assert_eq!(normalize_duration(1500), Duration::from_millis(1500));
        assert_eq!(normalize_duration(0), Duration::ZERO);
    }

    #[test]
    fn anchorless_strips_fragment() {
        assert_eq!(anchorless("https://a.test/p#frag"), "https://a.test/p");
        assert_eq!(anchorless("https://a.test/p"), "https://a.test/p");
    }

    #[test]
    fn first_and_last() {
        let clock = ManualClock::new();
        let mut tour = tour(3);
        tour.start(clock.now());
        assert!(tour.is_first());
        assert!(!tour.is_last());
        tour.next(false, clock.now());
        tour.next(false, clock.now());
        assert!(tour.is_last());
    }

    #[test]
    fn navigation_ignored_while_idle() {
        let clock = ManualClock::new();
        let mut tour = tour(3);
        tour.next(false, clock.now());
        tour.prev(false, clock.now());
        tour.move_to(2, clock.now());
        assert_eq!(tour.phase(), Phase::Idle);
        assert_eq!(tour.current_index(), 0);
    }

    #[test]
    fn deny_gate_blocks_unforced_next() {
        let clock = ManualClock::new();
        let steps = vec![
            Step::new().content("a").allow_next(false),
            Step::new().content("b"),
        ];
        let mut tour = Tour::new(MockViewport::new(), steps, TourConfig::default()).unwrap();
        tour.start(clock.now());
        tour.next(false, clock.now());
        assert_eq!(tour.current_index(), 0);
        tour.next(true, clock.now());
        assert_eq!(tour.current_index(), 1);
    }

    #[test]
    fn panicking_gate_denies() {
        let clock = ManualClock::new();
        let steps = vec![
            Step::new().content("a").allow_next_if(|_| panic!("gate")),
            Step::new().content("b"),
        ];
        let mut tour = Tour::new(MockViewport::new(), steps, TourConfig::default()).unwrap();
        tour.start(clock.now());
        assert!(!tour.is_next_allowed());
        tour.next(false, clock.now());
        assert_eq!(tour.current_index(), 0);
    }

    #[test]
    fn nav_state_labels_and_visibility() {
        let clock = ManualClock::new();
        let mut tour = tour(2);
        tour.start(clock.now());

        let nav = tour.nav_state();
        assert!(!nav.show_prev);
        assert!(nav.show_next);
        assert!(!nav.is_last);
        assert_eq!(nav.next_label, "Next");
        assert_eq!(nav.header_template, "{{step}}/{{steps}}");
        assert_eq!(nav.step_number, 1);
        assert_eq!(nav.step_count, 2);

        tour.next(false, clock.now());
        let nav = tour.nav_state();
        assert!(nav.show_prev);
        assert!(nav.is_last);
        assert_eq!(nav.next_label, "Finish");
        assert_eq!(nav.step_number, 2);
    }

    #[test]
    fn per_step_label_overrides_win() {
        let clock = ManualClock::new();
        let steps = vec![
            Step::new()
                .content("only")
                .finish_label("Done!")
                .close_label("Dismiss"),
        ];
        let mut tour = Tour::new(MockViewport::new(), steps, TourConfig::default()).unwrap();
        tour.start(clock.now());
        let nav = tour.nav_state();
        assert_eq!(nav.next_label, "Done!");
        assert_eq!(nav.close_label, "Dismiss");
    }

    #[test]
    fn close_label_falls_back_to_tour_default() {
        let clock = ManualClock::new();
        let mut tour = tour(2);
        tour.start(clock.now());
        assert_eq!(tour.nav_state().close_label, "Close");
    }

    #[test]
    fn keys_frozen_blocks_navigation() {
        let mut clock = ManualClock::new();
        let mut tour = tour(3);
        tour.start(clock.now());
        tour.set_keys_frozen(true);
        tour.handle_key(NavKey::ArrowRight, clock.advance(Duration::from_millis(10)));
        assert_eq!(tour.current_index(), 0);
        tour.set_keys_frozen(false);
        tour.handle_key(NavKey::ArrowRight, clock.advance(Duration::from_millis(10)));
        assert_eq!(tour.current_index(), 1);
    }

    #[test]
    fn escape_stops_the_tour() {
        let clock = ManualClock::new();
        let mut tour = tour(3);
        tour.start(clock.now());
        tour.handle_key(NavKey::Escape, clock.now());
        assert_eq!(tour.phase(), Phase::Idle);
    }

    #[test]
    fn invalid_step_skipped_forward() {
        let clock = ManualClock::new();
        // Step 1 requires content for a relative position but has none.
        let mut broken = Step::new();
        broken.position = Some(Position::Bottom);
        broken.target = crate::step::TargetSpec::Selector("#x".into());
        let steps = vec![Step::new().content("a"), broken, Step::new().content("c")];
        let mut tour = Tour::new(MockViewport::new(), steps, TourConfig::default()).unwrap();
        tour.start(clock.now());
        tour.next(false, clock.now());
        assert_eq!(tour.current_index(), 2);
    }

    #[test]
    fn invalid_step_aborts_when_configured() {
        let clock = ManualClock::new();
        let mut broken = Step::new();
        broken.position = Some(Position::Bottom);
        broken.target = crate::step::TargetSpec::Selector("#x".into());
        let steps = vec![Step::new().content("a"), broken];
        let config = TourConfig {
            abort_on_invalid_step: true,
            ..TourConfig::default()
        };
        let mut tour = Tour::new(MockViewport::new(), steps, config).unwrap();
        tour.start(clock.now());
        tour.next(false, clock.now());
        assert_eq!(tour.phase(), Phase::Idle);
    }

    #[test]
    fn anchor_step_valid_only_with_container() {
        let clock = ManualClock::new();
        let mut anchored = Step::new();
        anchored.position = Some(Position::Anchor);
        let steps = vec![anchored];

        let config = TourConfig {
            has_anchored_container: true,
            abort_on_invalid_step: true,
            ..TourConfig::default()
        };
        let mut tour = Tour::new(MockViewport::new(), steps, config).unwrap();
        tour.start(clock.now());
        assert_eq!(tour.phase(), Phase::StepActive);
        assert!(
            tour.adapter()
                .count_ops(|op| matches!(op, crate::testing::MockOp::AnchoredBoxVisible(true)))
                > 0
        );
    }
}

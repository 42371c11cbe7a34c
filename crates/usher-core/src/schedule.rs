#![forbid(unsafe_code)]

//! Cooperative task scheduling: one-shot and repeating tasks with cancel
//! handles, plus a pausable single-shot [`Timer`].
//!
//! Nothing here spawns threads or reads the wall clock. The host supplies
//! `now` explicitly and pumps [`Scheduler::fire_due`], which keeps the
//! whole engine single-threaded and deterministic under test.
//!
//! # Invariants
//!
//! 1. A cancelled task never fires, even if it was already due.
//! 2. Repeating tasks re-arm relative to their previous due time, so a
//!    late pump does not shift the cadence.
//! 3. Task ids are unique for the lifetime of a scheduler; `cancel` is
//!    idempotent.

use web_time::{Duration, Instant};

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Task<T> {
    id: TaskId,
    due: Instant,
    repeat: Option<Duration>,
    payload: T,
}

/// A queue of scheduled tasks, pumped by the host.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    fn insert(&mut self, due: Instant, repeat: Option<Duration>, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(task_id = id.0, repeating = repeat.is_some(), "task scheduled");
        self.tasks.push(Task {
            id,
            due,
            repeat,
            payload,
        });
        id
    }

    /// Schedule a task to fire once after `delay`.
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, payload: T) -> TaskId {
        self.insert(now + delay, None, payload)
    }

    /// Schedule a task to fire every `interval`, starting one interval
    /// from now. A zero interval cannot re-arm and degrades to an
    /// immediately due one-shot.
    pub fn schedule_repeat(&mut self, now: Instant, interval: Duration, payload: T) -> TaskId {
        let repeat = (!interval.is_zero()).then_some(interval);
        self.insert(now + interval, repeat, payload)
    }

    /// Cancel a task. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let cancelled = self.tasks.len() != before;
        #[cfg(feature = "tracing")]
        if cancelled {
            tracing::trace!(task_id = id.0, "task cancelled");
        }
        cancelled
    }

    /// Whether a task is still pending.
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    /// The earliest pending due time, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|task| task.due).min()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T: Clone> Scheduler<T> {
    /// Collect the payloads of every task due at `now`, in due order.
    ///
    /// One-shot tasks are removed; repeating tasks are re-armed. A
    /// repeating task that missed several intervals fires once per pump,
    /// not once per missed interval.
    pub fn fire_due(&mut self, now: Instant) -> Vec<T> {
        let mut due: Vec<(Instant, T)> = Vec::new();
        let mut remaining: Vec<Task<T>> = Vec::new();

        for mut task in self.tasks.drain(..) {
            if task.due > now {
                remaining.push(task);
                continue;
            }
            due.push((task.due, task.payload.clone()));
            if let Some(interval) = task.repeat {
                // Re-arm past `now` without firing for missed intervals.
                while task.due <= now {
                    task.due += interval;
                }
                remaining.push(task);
            }
        }

        self.tasks = remaining;
        due.sort_by_key(|(instant, _)| *instant);
        due.into_iter().map(|(_, payload)| payload).collect()
    }
}

/// State of a [`Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Running,
    Paused,
    Stopped,
    Fired,
}

/// A pausable, resumable single-shot delay.
///
/// Constructed already running. The host polls [`poll`](Self::poll) with
/// the current instant; it reports expiry exactly once. [`pause`]
/// (Self::pause) records the time consumed so far; [`resume`](Self::resume)
/// restarts the countdown for the remainder and returns it, so countdown
/// visuals can restart from the correct point.
#[derive(Debug, Clone)]
pub struct Timer {
    remaining: Duration,
    started_at: Instant,
    state: TimerState,
}

impl Timer {
    /// Create a timer that is already counting down from `now`.
    pub fn new(now: Instant, duration: Duration) -> Self {
        Self {
            remaining: duration,
            started_at: now,
            state: TimerState::Running,
        }
    }

    /// Pause the countdown, recording the time consumed so far.
    /// No-op unless running.
    pub fn pause(&mut self, now: Instant) {
        if self.state != TimerState::Running {
            return;
        }
        self.remaining = self.remaining.saturating_sub(now - self.started_at);
        self.state = TimerState::Paused;
    }

    /// Resume a paused countdown for the remaining duration, returning
    /// that remainder. Returns `Duration::ZERO` unless paused.
    pub fn resume(&mut self, now: Instant) -> Duration {
        if self.state != TimerState::Paused {
            return Duration::ZERO;
        }
        self.started_at = now;
        self.state = TimerState::Running;
        self.remaining
    }

    /// Permanently cancel the timer.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Whether the countdown is currently running.
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Time left on the countdown, accounting for elapsed running time.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.state {
            TimerState::Running => self.remaining.saturating_sub(now - self.started_at),
            TimerState::Paused => self.remaining,
            TimerState::Stopped | TimerState::Fired => Duration::ZERO,
        }
    }

    /// Check for expiry. Returns `true` exactly once, when the timer is
    /// running and its remaining time has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state == TimerState::Running && now - self.started_at >= self.remaining {
            self.state = TimerState::Fired;
            true
        } else {
            false
        }
    }
}

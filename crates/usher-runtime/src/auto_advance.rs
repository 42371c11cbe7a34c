#![forbid(unsafe_code)]

//! Auto-advance polling.
//!
//! Steps with an `auto_next` predicate are re-checked on the shared poll
//! cadence. The predicate runs behind a panic boundary; a panicking
//! predicate is treated as not satisfied and logged.

use std::panic::{AssertUnwindSafe, catch_unwind};

use usher_core::{Scheduler, TaskId};
use web_time::Instant;

use crate::step::AutoNextPredicate;
use crate::tasks::{POLL_INTERVAL, TaskKind};

#[derive(Debug, Default)]
pub(crate) struct AutoAdvancePoller {
    task: Option<TaskId>,
}

impl AutoAdvancePoller {
    /// Start polling. Replaces any previous poll.
    pub(crate) fn arm(&mut self, scheduler: &mut Scheduler<TaskKind>, now: Instant) {
        self.disarm(scheduler);
        self.task = Some(scheduler.schedule_repeat(now, POLL_INTERVAL, TaskKind::AutoAdvance));
    }

    pub(crate) fn disarm(&mut self, scheduler: &mut Scheduler<TaskKind>) {
        if let Some(id) = self.task.take() {
            scheduler.cancel(id);
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

/// Evaluate an auto-advance predicate behind a panic boundary.
pub(crate) fn eval_auto_next(predicate: &AutoNextPredicate) -> bool {
    catch_unwind(AssertUnwindSafe(predicate)).unwrap_or_else(|_| {
        tracing::error!("auto-advance predicate panicked; treating as not satisfied");
        false
    })
}

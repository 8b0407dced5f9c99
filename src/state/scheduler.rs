//! Deferred recomputation queue.
//!
//! Some recomputations must wait until the host has rendered once more, for
//! example re-measuring rows after the data set changed. The controller
//! queues those as [`Task`]s; the host drains the queue once per frame by
//! calling `GridController::run_pending`.
//!
//! Queuing a task that is already pending is a no-op, so bursts of the same
//! signal collapse into one recomputation on the next tick.

use std::collections::VecDeque;
use tracing::trace;

/// Deferred recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Scroll back to the first row.
    ResetScroll,
    /// Recompute window, widths and selection aggregates.
    Refresh,
    /// Recompute widths and window from the latest measurements.
    Remeasure,
    /// Apply the latest pointer position of a column drag.
    ColumnDrag,
}

/// FIFO of distinct pending tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<Task>,
}

impl Scheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` unless it is already pending.
    ///
    /// Returns false when the task coalesced into an earlier request.
    pub fn schedule(&mut self, task: Task) -> bool {
        if self.queue.contains(&task) {
            trace!(?task, "coalesced");
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// Whether `task` is waiting for the next tick.
    pub fn is_pending(&self, task: Task) -> bool {
        self.queue.contains(&task)
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued task in FIFO order.
    ///
    /// Tasks scheduled while the returned batch runs belong to the next tick.
    pub fn take_batch(&mut self) -> Vec<Task> {
        self.queue.drain(..).collect()
    }
}

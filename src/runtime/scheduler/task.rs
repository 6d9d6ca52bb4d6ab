//! Task definitions for the task queue.
//!
//! A task is a unit of work submitted to a [`TaskQueue`](super::TaskQueue),
//! identified by a [`TaskId`] and tracked through [`TaskState`].

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

impl fmt::Display for TaskId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for the tasks ahead of it.
    Queued,
    /// Started; its result has not settled yet.
    Running,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a rejection.
    Rejected,
}

/// A submitted, not yet finished task.
///
/// The queue keeps the item at its head while the task runs; `run` is taken
/// out when the task starts.
pub(crate) struct TaskItem {
    pub(crate) id: TaskId,
    pub(crate) state: TaskState,
    pub(crate) run: Option<Box<dyn FnOnce() + Send>>,
}

impl TaskItem {
    pub(crate) fn new(
        id: TaskId,
        run: Box<dyn FnOnce() + Send>,
    ) -> Self {
        Self {
            id,
            state: TaskState::Queued,
            run: Some(run),
        }
    }
}

impl fmt::Debug for TaskItem {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TaskItem")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}

/// Thread-safe generator for task IDs.
#[derive(Debug)]
pub struct TaskIdGenerator {
    next_id: AtomicUsize,
}

impl TaskIdGenerator {
    /// Create a new task ID generator.
    #[inline]
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
        }
    }

    /// Generate the next task ID.
    #[inline]
    pub fn generate(&self) -> TaskId {
        TaskId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TaskIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

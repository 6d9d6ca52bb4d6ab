//! Task scheduling
//!
//! This module provides the [`TaskQueue`], a FIFO serializer that guarantees
//! exactly one unit of asynchronous work is in flight at a time.

pub mod queue;
pub mod task;

pub use queue::TaskQueue;
pub use task::{TaskId, TaskIdGenerator, TaskState};

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Task queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Name used in log events.
    #[serde(default = "default_queue_name")]
    pub name: String,
    /// Emit a warning when a task rejects.
    #[serde(default = "default_log_rejections")]
    pub log_rejections: bool,
}

fn default_queue_name() -> String {
    "tasks".to_string()
}

fn default_log_rejections() -> bool {
    true
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
            log_rejections: default_log_rejections(),
        }
    }
}

impl QueueConfig {
    /// Config with the given queue name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Task queue errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The task's work panicked; holds the panic message.
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Task queue statistics.
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks submitted.
    pub submitted: AtomicUsize,
    /// Total tasks fulfilled.
    pub fulfilled: AtomicUsize,
    /// Total tasks rejected.
    pub rejected: AtomicUsize,
}

impl QueueStats {
    /// Record a submitted task.
    #[inline]
    pub fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a finished task.
    #[inline]
    pub fn record_finished(
        &self,
        state: TaskState,
    ) {
        let counter = match state {
            TaskState::Fulfilled => &self.fulfilled,
            TaskState::Rejected => &self.rejected,
            TaskState::Queued | TaskState::Running => return,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Tasks submitted but not finished yet.
    pub fn in_queue(&self) -> usize {
        let finished =
            self.fulfilled.load(Ordering::SeqCst) + self.rejected.load(Ordering::SeqCst);
        self.submitted.load(Ordering::SeqCst).saturating_sub(finished)
    }
}

#[cfg(test)]
mod tests;

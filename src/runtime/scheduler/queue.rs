//! FIFO task queue
//!
//! Serializes otherwise concurrent asynchronous work: tasks start in
//! submission order and task *k+1* never starts before task *k* has settled,
//! whatever its outcome.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::task::{TaskId, TaskIdGenerator, TaskItem, TaskState};
use super::{QueueConfig, QueueError, QueueStats};
use crate::runtime::promise::{defer, Outcome, Promise};

#[derive(Debug, Default)]
struct QueueState {
    /// Not yet finished tasks; the head is the one in flight.
    tasks: VecDeque<TaskItem>,
    /// The head task has started and not settled.
    running: bool,
    /// Some call frame is inside `drain`.
    draining: bool,
}

/// State shared by every handle of one queue.
///
/// Task closures only hold a `Weak` to it, so dropping the last
/// [`TaskQueue`] frees the queue and its waiting tasks even while the head
/// task never settles.
pub(super) struct Shared {
    state: Mutex<QueueState>,
    config: QueueConfig,
    stats: QueueStats,
    ids: TaskIdGenerator,
}

/// A queue that runs submitted work one task at a time.
///
/// Cloning yields another handle to the same queue. A panic inside a task's
/// work rejects that task with [`QueueError::Panicked`] and the queue moves
/// on.
///
/// ```
/// use yaoxiang_promise::{Promise, Resolution, TaskQueue};
///
/// let queue = TaskQueue::new();
/// let (gate, open) = Promise::<()>::pending();
///
/// let first = queue.submit(move || Ok(Resolution::Deferred(gate)));
/// let second = queue.submit(|| Ok(Resolution::Value("second")));
/// assert!(second.is_pending());
///
/// open.resolve(());
/// assert!(first.is_fulfilled());
/// assert_eq!(second.value(), Some("second"));
/// assert!(queue.is_idle());
/// ```
#[derive(Clone)]
pub struct TaskQueue {
    pub(super) shared: Arc<Shared>,
}

impl TaskQueue {
    /// Create a new idle queue with default config.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue with custom configuration.
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::default()),
                config,
                stats: QueueStats::default(),
                ids: TaskIdGenerator::new(),
            }),
        }
    }

    /// Submit `work` and get a promise of its result.
    ///
    /// Arguments are bound by capturing them in the closure. The work runs
    /// right away if the queue is idle, otherwise after every task submitted
    /// before it has settled. An `Err` from the work rejects only this
    /// task's promise; the queue moves on.
    pub fn submit<T, F>(
        &self,
        work: F,
    ) -> Promise<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> Outcome<T> + Send + 'static,
    {
        let shared = &self.shared;
        let (promise, resolver) = Promise::pending();
        let id = shared.ids.generate();

        let queue = Arc::downgrade(shared);
        let run = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
                Err(QueueError::Panicked(panic_message(&*payload)).into())
            });
            Promise::from_outcome(outcome).subscribe(move |outcome| {
                let Some(queue) = queue.upgrade() else {
                    resolver.settle_result(outcome);
                    return;
                };
                let state = match &outcome {
                    Ok(_) => TaskState::Fulfilled,
                    Err(reason) => {
                        if queue.config.log_rejections {
                            warn!(queue = %queue.config.name, task = %id, %reason, "task rejected");
                        }
                        TaskState::Rejected
                    }
                };
                resolver.settle_result(outcome);
                // Queued behind the caller's reactions.
                defer(move || queue.finish(id, state));
            });
        });

        shared.stats.record_submitted();
        let drive = {
            let mut state = shared.state.lock();
            state.tasks.push_back(TaskItem::new(id, run));
            trace!(queue = %shared.config.name, task = %id, queued = state.tasks.len(), "task submitted");
            !state.running && !std::mem::replace(&mut state.draining, true)
        };
        if drive {
            shared.drain();
        }
        promise
    }

    /// True iff no task is in flight or waiting.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.shared.state.lock().tasks.is_empty()
    }

    /// Number of unfinished tasks, including the one in flight.
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.state.lock().tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }

    /// Unfinished tasks in start order.
    pub fn tasks(&self) -> Vec<(TaskId, TaskState)> {
        self.shared
            .state
            .lock()
            .tasks
            .iter()
            .map(|item| (item.id, item.state))
            .collect()
    }

    /// Queue name, as used in log events.
    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    #[inline]
    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }

    #[inline]
    pub fn stats(&self) -> &QueueStats {
        &self.shared.stats
    }
}

impl Shared {
    /// Start head tasks until one stays in flight or the queue is empty.
    ///
    /// A task that settles synchronously may reach `finish` from inside
    /// `run`; `finish` then leaves the next start to this loop instead of
    /// recursing.
    fn drain(&self) {
        loop {
            let (id, run) = {
                let mut guard = self.state.lock();
                let state = &mut *guard;
                if state.running {
                    state.draining = false;
                    return;
                }
                let Some(head) = state.tasks.front_mut() else {
                    state.draining = false;
                    return;
                };
                let Some(run) = head.run.take() else {
                    state.draining = false;
                    return;
                };
                head.state = TaskState::Running;
                state.running = true;
                (head.id, run)
            };
            debug!(queue = %self.config.name, task = %id, "task started");
            run();
        }
    }

    /// Remove the finished head task and move on to the next one.
    fn finish(
        &self,
        id: TaskId,
        outcome: TaskState,
    ) {
        self.stats.record_finished(outcome);
        let drive = {
            let mut state = self.state.lock();
            let head = state.tasks.pop_front();
            debug_assert_eq!(head.map(|item| item.id), Some(id));
            state.running = false;
            debug!(queue = %self.config.name, task = %id, state = ?outcome, remaining = state.tasks.len(), "task finished");
            !std::mem::replace(&mut state.draining, true)
        };
        if drive {
            self.drain();
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("TaskQueue")
            .field("name", &self.shared.config.name)
            .field("tasks", &state.tasks)
            .field("running", &state.running)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

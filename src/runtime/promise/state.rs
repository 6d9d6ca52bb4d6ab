//! Settlement state machine
//!
//! Every promise owns one [`Core`]: its status, the stored result once
//! settled, and the reactions waiting for it. The core is only touched
//! through [`Resolver`] (settlement) and [`Promise`] (reaction registration).
//! No lock is ever held while a reaction or user callback runs.
//!
//! Reactions of a settling promise are not called from `complete` directly.
//! They go onto a per-thread job queue that the outermost settlement drains
//! in a loop, so a chain of any length settles in constant stack.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::Arc;
use std::task::Waker;

use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::reason::{PromiseError, Reason};
use super::{Outcome, Promise};

/// A continuation waiting for settlement.
pub(crate) type Reaction<T> = Box<dyn FnOnce(Result<T, Reason>) + Send>;

/// Shared handle to a promise core.
pub(crate) type SharedCore<T> = Arc<Mutex<Core<T>>>;

/// Promise status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

impl Status {
    #[inline]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Status::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Fulfilled => "fulfilled",
            Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a promise settles with: a value, or another promise to follow.
///
/// Handlers, executors and combinator inputs all speak this type. A
/// `Deferred` resolution is never exposed as a value; the receiving promise
/// waits for it and takes over its result.
#[derive(Debug)]
pub enum Resolution<T> {
    /// An available value.
    Value(T),
    /// A promise whose eventual result is adopted.
    Deferred(Promise<T>),
}

impl<T> From<Promise<T>> for Resolution<T> {
    fn from(promise: Promise<T>) -> Self {
        Resolution::Deferred(promise)
    }
}

pub(crate) enum State<T> {
    Pending(SmallVec<[Reaction<T>; 1]>),
    Settled(Result<T, Reason>),
}

pub(crate) struct Core<T> {
    pub(crate) state: State<T>,
    /// Set by the first `resolve`/`reject`. May be set while still pending,
    /// when the promise is following another one.
    claimed: bool,
    /// Tasks awaiting this promise as a `Future`.
    pub(crate) wakers: SmallVec<[Waker; 1]>,
}

impl<T> Core<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Pending(SmallVec::new()),
            claimed: false,
            wakers: SmallVec::new(),
        }
    }

    pub(crate) fn status(&self) -> Status {
        match &self.state {
            State::Pending(_) => Status::Pending,
            State::Settled(Ok(_)) => Status::Fulfilled,
            State::Settled(Err(_)) => Status::Rejected,
        }
    }
}

/// Register `reaction` on `core`.
///
/// Pending: queued and run at settlement. Settled: run right away against
/// the stored result. Both paths run the same closure.
pub(crate) fn subscribe<T, F>(
    core: &SharedCore<T>,
    reaction: F,
) where
    T: Clone + Send + 'static,
    F: FnOnce(Result<T, Reason>) + Send + 'static,
{
    let settled = {
        let mut guard = core.lock();
        match &mut guard.state {
            State::Pending(reactions) => {
                reactions.push(Box::new(reaction));
                return;
            }
            State::Settled(outcome) => outcome.clone(),
        }
    };
    reaction(settled);
}

/// Move `core` out of pending and flush its reactions in registration order.
/// Does nothing if already settled.
fn complete<T>(
    core: &SharedCore<T>,
    outcome: Result<T, Reason>,
) where
    T: Clone + Send + 'static,
{
    let (reactions, wakers) = {
        let mut guard = core.lock();
        match mem::replace(&mut guard.state, State::Settled(outcome.clone())) {
            State::Pending(reactions) => (reactions, mem::take(&mut guard.wakers)),
            settled @ State::Settled(_) => {
                guard.state = settled;
                return;
            }
        }
    };

    let status = match &outcome {
        Ok(_) => Status::Fulfilled,
        Err(_) => Status::Rejected,
    };
    trace!(%status, reactions = reactions.len(), "promise settled");

    for reaction in reactions {
        let outcome = outcome.clone();
        enqueue(Box::new(move || reaction(outcome)));
    }
    for waker in wakers {
        waker.wake();
    }
    flush();
}

type Job = Box<dyn FnOnce()>;

thread_local! {
    static JOBS: RefCell<VecDeque<Job>> = const { RefCell::new(VecDeque::new()) };
    static FLUSHING: Cell<bool> = const { Cell::new(false) };
}

/// Run `job` after every job already queued on this thread.
///
/// Outside a flush this runs it right away, along with anything it queues.
pub(crate) fn defer<F>(job: F)
where
    F: FnOnce() + 'static,
{
    enqueue(Box::new(job));
    flush();
}

fn enqueue(job: Job) {
    JOBS.with(|jobs| jobs.borrow_mut().push_back(job));
}

/// Drain the job queue unless an outer frame is already draining it.
fn flush() {
    if FLUSHING.with(|flushing| flushing.replace(true)) {
        return;
    }
    let _guard = FlushGuard;
    while let Some(job) = JOBS.with(|jobs| jobs.borrow_mut().pop_front()) {
        job();
    }
}

/// Clears the flushing flag, also when a job panics. Jobs queued behind
/// the panicking one wait for the next flush on this thread.
struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        FLUSHING.with(|flushing| flushing.set(false));
    }
}

/// The settlement side of a promise.
///
/// Only the first call to [`resolve`](Self::resolve), [`follow`](Self::follow),
/// [`settle`](Self::settle) or [`reject`](Self::reject) has any effect, across
/// all clones of the resolver.
pub struct Resolver<T> {
    core: SharedCore<T>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let core = self.core.lock();
        f.debug_struct("Resolver")
            .field("status", &core.status())
            .field("claimed", &core.claimed)
            .finish()
    }
}

impl<T> Resolver<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(core: SharedCore<T>) -> Self {
        Self { core }
    }

    /// Fulfill with `value`.
    #[inline]
    pub fn resolve(
        &self,
        value: T,
    ) {
        self.settle(Resolution::Value(value));
    }

    /// Adopt the eventual result of `promise`.
    #[inline]
    pub fn follow(
        &self,
        promise: Promise<T>,
    ) {
        self.settle(Resolution::Deferred(promise));
    }

    /// Settle with a value or by following another promise.
    ///
    /// Following attaches a reaction to the inner promise instead of
    /// recursing. Settling the end of a long follow chain then walks it
    /// through the job queue, one link per job.
    pub fn settle(
        &self,
        resolution: Resolution<T>,
    ) {
        if !self.claim() {
            trace!("ignoring repeated settlement");
            return;
        }
        match resolution {
            Resolution::Value(value) => complete(&self.core, Ok(value)),
            Resolution::Deferred(inner) => {
                if Arc::ptr_eq(&inner.core, &self.core) {
                    debug!("promise resolved with itself");
                    complete(&self.core, Err(PromiseError::Cycle.into()));
                    return;
                }
                let core = self.core.clone();
                subscribe(&inner.core, move |outcome| complete(&core, outcome));
            }
        }
    }

    /// Reject with `reason`. Reasons are never unwrapped.
    pub fn reject(
        &self,
        reason: impl Into<Reason>,
    ) {
        if !self.claim() {
            trace!("ignoring repeated rejection");
            return;
        }
        complete(&self.core, Err(reason.into()));
    }

    /// Settle from a handler's return value: `Err` rejects.
    pub fn apply(
        &self,
        outcome: Outcome<T>,
    ) {
        match outcome {
            Ok(resolution) => self.settle(resolution),
            Err(error) => self.reject(error),
        }
    }

    /// Settle from a stored result.
    pub fn settle_result(
        &self,
        result: Result<T, Reason>,
    ) {
        match result {
            Ok(value) => self.resolve(value),
            Err(reason) => self.reject(reason),
        }
    }

    /// Whether a settlement call has already been made.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.core.lock().claimed
    }

    fn claim(&self) -> bool {
        let mut core = self.core.lock();
        !mem::replace(&mut core.claimed, true)
    }
}

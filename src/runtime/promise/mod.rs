//! Deferred values
//!
//! [`Promise<T>`] is a single-assignment container for a value (or rejection
//! [`Reason`]) that becomes available later. Continuations are attached with
//! [`then`](Promise::then), [`catch`](Promise::catch) and
//! [`finally`](Promise::finally); several promises are combined with
//! [`all`](Promise::all), [`all_settled`](Promise::all_settled),
//! [`any`](Promise::any) and [`race`](Promise::race).
//!
//! Reactions run synchronously, in registration order, before the call that
//! settled the promise returns; a reaction registered on a settled promise
//! runs immediately. Settlements triggered from inside a reaction are queued
//! behind it rather than nested, so stack depth does not grow with chain
//! length. Nothing here spawns or blocks; suspension only happens at the
//! edges, where timers and I/O settle promises from outside. A promise can
//! also be `.await`ed.
//!
//! # Example
//!
//! ```
//! use yaoxiang_promise::{Promise, Resolution};
//!
//! let (source, resolver) = Promise::<i32>::pending();
//! let doubled = source.then(|v| Ok(Resolution::Value(v * 2)));
//! assert!(doubled.is_pending());
//!
//! resolver.resolve(21);
//! assert_eq!(doubled.value(), Some(42));
//! ```

mod chain;
mod combinators;
mod future;
mod reason;
mod state;

pub use combinators::Settlement;
pub use reason::{AggregateError, PromiseError, Reason};
pub use state::{Resolution, Resolver, Status};

pub(crate) use state::defer;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use state::{Core, SharedCore, State};

/// What a handler returns: a value or promise to continue with, or an error
/// that rejects the derived promise.
pub type Outcome<T> = anyhow::Result<Resolution<T>>;

/// A deferred value.
///
/// Cloning yields another handle to the same promise.
pub struct Promise<T> {
    pub(crate) core: SharedCore<T>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Promise<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let core = self.core.lock();
        let mut out = f.debug_struct("Promise");
        out.field("status", &core.status());
        match &core.state {
            State::Pending(_) => {}
            State::Settled(Ok(value)) => {
                out.field("value", value);
            }
            State::Settled(Err(reason)) => {
                out.field("reason", reason);
            }
        }
        out.finish()
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Create a promise driven by `executor`.
    ///
    /// The executor runs synchronously, exactly once, with the promise's
    /// resolver. Returning `Err` rejects the promise, unless the executor
    /// already settled it.
    ///
    /// ```
    /// use yaoxiang_promise::Promise;
    ///
    /// let p = Promise::<u8>::new(|_| anyhow::bail!("Uh-oh!"));
    /// assert_eq!(p.reason().unwrap().to_string(), "Uh-oh!");
    /// ```
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolver<T>) -> anyhow::Result<()>,
    {
        let (promise, resolver) = Self::pending();
        if let Err(error) = executor(resolver.clone()) {
            resolver.reject(error);
        }
        promise
    }

    /// A pending promise together with its resolver.
    pub fn pending() -> (Self, Resolver<T>) {
        let core = Arc::new(Mutex::new(Core::new()));
        let resolver = Resolver::new(core.clone());
        (Self { core }, resolver)
    }

    /// An already fulfilled promise.
    pub fn resolve(value: T) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.resolve(value);
        promise
    }

    /// An already rejected promise.
    pub fn reject(reason: impl Into<Reason>) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.reject(reason);
        promise
    }

    /// A promise settled from a handler-style outcome: `Err` rejects,
    /// `Deferred` is followed.
    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.apply(outcome);
        promise
    }

    /// Current status.
    #[inline]
    pub fn status(&self) -> Status {
        self.core.lock().status()
    }

    /// The fulfillment value, if fulfilled.
    pub fn value(&self) -> Option<T> {
        match &self.core.lock().state {
            State::Settled(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<Reason> {
        match &self.core.lock().state {
            State::Settled(Err(reason)) => Some(reason.clone()),
            _ => None,
        }
    }

    /// The stored result, if settled.
    pub fn result(&self) -> Option<Result<T, Reason>> {
        match &self.core.lock().state {
            State::Settled(outcome) => Some(outcome.clone()),
            State::Pending(_) => None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status() == Status::Pending
    }

    #[inline]
    pub fn is_fulfilled(&self) -> bool {
        self.status() == Status::Fulfilled
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.status() == Status::Rejected
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    /// Whether both handles refer to the same promise.
    #[inline]
    pub fn ptr_eq(
        &self,
        other: &Promise<T>,
    ) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    /// Run `reaction` once this promise settles.
    pub(crate) fn subscribe<F>(
        &self,
        reaction: F,
    ) where
        F: FnOnce(Result<T, Reason>) + Send + 'static,
    {
        state::subscribe(&self.core, reaction);
    }
}

impl<T> From<Resolution<T>> for Promise<T>
where
    T: Clone + Send + 'static,
{
    /// `Value` gives a fulfilled promise, `Deferred` the promise itself.
    fn from(resolution: Resolution<T>) -> Self {
        match resolution {
            Resolution::Value(value) => Promise::resolve(value),
            Resolution::Deferred(promise) => promise,
        }
    }
}

#[cfg(test)]
mod tests;

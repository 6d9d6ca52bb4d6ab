//! Reaction chain: `then`, `catch`, `finally`
//!
//! Each method derives a new promise from `self`. The reaction closure is
//! registered once through [`Promise::subscribe`], which either queues it or
//! runs it against the stored result, so early and late registration take
//! the same path.

use super::{Outcome, Promise, Reason, Resolution, Resolver};

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Continue with `on_fulfilled` once fulfilled. A rejection propagates
    /// unchanged to the derived promise.
    ///
    /// The fulfillment handler is mandatory; there is no pass-through form.
    /// Rejection-only reactions go through [`catch`](Self::catch).
    ///
    /// ```compile_fail
    /// use yaoxiang_promise::Promise;
    ///
    /// let p = Promise::resolve(1);
    /// let _ = p.then(None);
    /// ```
    pub fn then<U, F>(
        &self,
        on_fulfilled: F,
    ) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Outcome<U> + Send + 'static,
    {
        self.derive(move |outcome, next| match outcome {
            Ok(value) => next.apply(on_fulfilled(value)),
            Err(reason) => next.reject(reason),
        })
    }

    /// Continue with `on_fulfilled` or `on_rejected`, whichever matches the
    /// settlement. A normal return from `on_rejected` recovers the chain.
    pub fn then_or_else<U, F, R>(
        &self,
        on_fulfilled: F,
        on_rejected: R,
    ) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Outcome<U> + Send + 'static,
        R: FnOnce(Reason) -> Outcome<U> + Send + 'static,
    {
        self.derive(move |outcome, next| match outcome {
            Ok(value) => next.apply(on_fulfilled(value)),
            Err(reason) => next.apply(on_rejected(reason)),
        })
    }

    /// Handle a rejection. Fulfillment flows through untouched.
    pub fn catch<R>(
        &self,
        on_rejected: R,
    ) -> Promise<T>
    where
        R: FnOnce(Reason) -> Outcome<T> + Send + 'static,
    {
        self.derive(move |outcome, next| match outcome {
            Ok(value) => next.resolve(value),
            Err(reason) => next.apply(on_rejected(reason)),
        })
    }

    /// Run `on_finally` on either outcome, then pass the original outcome on.
    ///
    /// The handler's value is discarded. A returned promise delays the
    /// original outcome until it settles. If the handler fails, or its
    /// promise rejects, that rejection replaces the original outcome.
    pub fn finally<X, F>(
        &self,
        on_finally: F,
    ) -> Promise<T>
    where
        X: Clone + Send + 'static,
        F: FnOnce() -> Outcome<X> + Send + 'static,
    {
        self.derive(move |outcome, next| match on_finally() {
            Ok(Resolution::Value(_)) => next.settle_result(outcome),
            Ok(Resolution::Deferred(pending)) => pending.subscribe(move |done| match done {
                Ok(_) => next.settle_result(outcome),
                Err(reason) => next.reject(reason),
            }),
            Err(error) => next.reject(error),
        })
    }

    fn derive<U, F>(
        &self,
        reaction: F,
    ) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Result<T, Reason>, Resolver<U>) + Send + 'static,
    {
        let (promise, next) = Promise::pending();
        self.subscribe(move |outcome| reaction(outcome, next));
        promise
    }
}

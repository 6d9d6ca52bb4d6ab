//! Callback interop
//!
//! A callback-style routine takes its arguments plus a completion callback
//! and reports exactly one `Ok` or `Err` through it, possibly much later.

use crate::runtime::promise::{Promise, Reason};

/// Completion callback handed to callback-style routines.
pub type Callback<T> = Box<dyn FnOnce(anyhow::Result<T>) + Send>;

/// Run a callback-style routine and get a promise of what it reports.
///
/// The routine runs synchronously. The promise settles when the callback is
/// invoked; if the routine drops the callback unused, it stays pending.
///
/// ```
/// use yaoxiang_promise::tools::from_callback;
///
/// let p = from_callback(|done| done(Ok("hello")));
/// assert_eq!(p.value(), Some("hello"));
/// ```
pub fn from_callback<T, F>(routine: F) -> Promise<T>
where
    T: Clone + Send + 'static,
    F: FnOnce(Callback<T>),
{
    Promise::new(|resolver| {
        routine(Box::new(move |result: anyhow::Result<T>| match result {
            Ok(value) => resolver.resolve(value),
            Err(error) => resolver.reject(error),
        }));
        Ok(())
    })
}

/// Turn a callback-style routine into a promise-returning function.
///
/// Several arguments are passed as a tuple.
///
/// ```
/// use yaoxiang_promise::tools::{promisify, Callback};
///
/// let divide = promisify(|(a, b): (i32, i32), done: Callback<i32>| {
///     if b == 0 {
///         done(Err(anyhow::anyhow!("division by zero")))
///     } else {
///         done(Ok(a / b))
///     }
/// });
/// assert_eq!(divide((6, 3)).value(), Some(2));
/// assert!(divide((1, 0)).is_rejected());
/// ```
pub fn promisify<A, T, F>(routine: F) -> impl Fn(A) -> Promise<T>
where
    T: Clone + Send + 'static,
    F: Fn(A, Callback<T>),
{
    move |args| from_callback(|callback| routine(args, callback))
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Hand the eventual result to a callback-style consumer.
    ///
    /// `callback` runs exactly once, when the promise settles, or right away
    /// if it already has.
    pub fn into_callback<F>(
        self,
        callback: F,
    ) where
        F: FnOnce(Result<T, Reason>) + Send + 'static,
    {
        self.subscribe(callback);
    }
}

//! Externally driven settlement
//!
//! Tokio timers stand in for the I/O that settles promises in real programs.

use std::time::Duration;

use yaoxiang_promise::{Promise, Reason};

/// A promise fulfilled with `value` after `ms` milliseconds.
pub fn fulfilled_after<T>(
    ms: u64,
    value: T,
) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let (promise, resolver) = Promise::pending();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        resolver.resolve(value);
    });
    promise
}

/// A promise rejected with `message` after `ms` milliseconds.
pub fn rejected_after<T>(
    ms: u64,
    message: &'static str,
) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let (promise, resolver) = Promise::pending();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        resolver.reject(Reason::msg(message));
    });
    promise
}

use tracing::debug;

use crate::runtime::promise::{Promise, Resolver};

/// Run the promise produced by `factory`, retrying on rejection.
///
/// `factory` is called once, then again after every rejection, at most
/// `times` more times. The returned promise adopts the first fulfillment,
/// or the reason of the last attempt.
///
/// ```
/// use yaoxiang_promise::{tools::retry, Promise};
///
/// let mut calls = 0;
/// let p = retry(2, move || {
///     calls += 1;
///     if calls < 3 {
///         Promise::reject(anyhow::anyhow!("flaky"))
///     } else {
///         Promise::resolve(calls)
///     }
/// });
/// assert_eq!(p.value(), Some(3));
/// ```
pub fn retry<T, G>(
    times: usize,
    factory: G,
) -> Promise<T>
where
    T: Clone + Send + 'static,
    G: FnMut() -> Promise<T> + Send + 'static,
{
    let (promise, resolver) = Promise::pending();
    attempt(times, factory, resolver);
    promise
}

fn attempt<T, G>(
    remaining: usize,
    mut factory: G,
    resolver: Resolver<T>,
) where
    T: Clone + Send + 'static,
    G: FnMut() -> Promise<T> + Send + 'static,
{
    factory().subscribe(move |outcome| match outcome {
        Err(reason) if remaining > 0 => {
            debug!(%reason, remaining, "attempt rejected, retrying");
            attempt(remaining - 1, factory, resolver);
        }
        outcome => resolver.settle_result(outcome),
    });
}

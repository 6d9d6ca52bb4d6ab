//! `Future` integration
//!
//! Awaiting a promise parks the task until settlement; it never drives the
//! settlement itself. Whatever executor polls it (Tokio, a test harness, ...)
//! is woken when the promise settles.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::state::State;
use super::{Promise, Reason};

impl<T> Future for Promise<T>
where
    T: Clone + Send + 'static,
{
    type Output = Result<T, Reason>;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        let mut core = self.core.lock();
        if let State::Settled(outcome) = &core.state {
            return Poll::Ready(outcome.clone());
        }
        if !core.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            core.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

//! Tools integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use yaoxiang_promise::tools::{promisify, retry, Callback};
use yaoxiang_promise::Promise;

use crate::timers::{fulfilled_after, rejected_after};

#[tokio::test(start_paused = true)]
async fn test_retry_flaky_remote_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let p = retry(3, move || {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            rejected_after(100, "connection reset")
        } else {
            fulfilled_after(100, "payload")
        }
    });
    assert_eq!(p.await.unwrap(), "payload");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_promisify_timer_callback() {
    let delayed_double = promisify(|n: u32, done: Callback<u32>| {
        let timer: Promise<u32> = fulfilled_after(20, n * 2);
        timer.into_callback(move |result| done(result.map_err(anyhow::Error::new)));
    });
    assert_eq!(delayed_double(21).await.unwrap(), 42);
}

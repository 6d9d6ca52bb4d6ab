//! Combinator integration tests
//!
//! Inputs settle on a paused Tokio clock, so timings are exact.

use std::time::Duration;

use tokio::time::Instant;
use yaoxiang_promise::{AggregateError, Promise, Reason, Resolution, Settlement};

use crate::timers::{fulfilled_after, rejected_after};

#[tokio::test(start_paused = true)]
async fn test_all_waits_for_slowest() {
    let start = Instant::now();
    let all = Promise::all([
        Resolution::Value(1),
        Resolution::Deferred(fulfilled_after(300, 2)),
        Resolution::Deferred(fulfilled_after(100, 3)),
    ]);
    assert_eq!(all.await.unwrap(), vec![1, 2, 3]);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_all_rejects_on_first_failure() {
    let start = Instant::now();
    let all = Promise::all([
        Resolution::Deferred(fulfilled_after(500, 1)),
        Resolution::Deferred(rejected_after(100, "x")),
        Resolution::Deferred(rejected_after(200, "y")),
    ]);
    let reason = all.await.unwrap_err();
    assert_eq!(reason.to_string(), "x");
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_all_settled_reports_each_input() {
    let settled = Promise::all_settled([
        Resolution::Deferred(fulfilled_after(200, 3)),
        Resolution::Deferred(rejected_after(100, "foo")),
    ])
    .await
    .unwrap();

    assert_eq!(settled.len(), 2);
    assert!(matches!(settled[0], Settlement::Fulfilled { value: 3 }));
    assert_eq!(settled[1].reason().unwrap().to_string(), "foo");
}

#[tokio::test(start_paused = true)]
async fn test_any_takes_first_fulfillment() {
    let start = Instant::now();
    let any = Promise::any([
        Resolution::Deferred(Promise::reject(Reason::msg("0"))),
        Resolution::Deferred(fulfilled_after(100, "quick")),
        Resolution::Deferred(fulfilled_after(500, "slow")),
    ]);
    assert_eq!(any.await.unwrap(), "quick");

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_any_all_rejected_keeps_input_order() {
    let any = Promise::<u8>::any([
        Resolution::Deferred(rejected_after(300, "first")),
        Resolution::Deferred(rejected_after(100, "second")),
    ]);
    let reason = any.await.unwrap_err();
    let aggregate = reason.downcast_ref::<AggregateError>().unwrap();
    let messages: Vec<String> = aggregate.reasons().iter().map(|r| r.to_string()).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn test_race_takes_first_settlement() {
    let race = Promise::race([
        Resolution::Deferred(fulfilled_after(500, "one")),
        Resolution::Deferred(fulfilled_after(100, "two")),
    ]);
    assert_eq!(race.await.unwrap(), "two");
}

#[tokio::test(start_paused = true)]
async fn test_race_adopts_early_rejection() {
    let race = Promise::<&str>::race([
        Resolution::Deferred(fulfilled_after(500, "late")),
        Resolution::Deferred(rejected_after(100, "early")),
    ]);
    assert_eq!(race.await.unwrap_err().to_string(), "early");
}

#[tokio::test(start_paused = true)]
async fn test_race_of_nothing_stays_pending() {
    let race = Promise::<()>::race(Vec::new());
    let waited = tokio::time::timeout(Duration::from_secs(3600), race).await;
    assert!(waited.is_err());
}

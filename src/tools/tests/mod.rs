//! Tools 单元测试
//!
//! 测试 detach、retry 与回调适配

use crate::runtime::promise::{Promise, Resolution};
use crate::tools::{detach, from_callback, promisify, retry, Callback};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Collects formatted log output.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

fn capture_logs(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[cfg(test)]
mod detach_tests {
    use super::*;

    #[test]
    fn test_detach_reports_later_rejection() {
        let (p, resolver) = Promise::<i32>::pending();
        let logs = capture_logs(|| {
            detach(&p);
            resolver.reject(anyhow::anyhow!("disk full"));
        });
        assert!(logs.contains("detached promise rejected"));
        assert!(logs.contains("disk full"));
    }

    #[test]
    fn test_detach_is_silent_on_fulfillment() {
        let p = Promise::resolve(1);
        let logs = capture_logs(|| detach(&p));
        assert!(!logs.contains("detached promise rejected"));
    }

    #[test]
    fn test_detach_leaves_promise_usable() {
        let p = Promise::<i32>::reject(anyhow::anyhow!("nope"));
        detach(&p);
        let recovered = p.catch(|_| Ok(Resolution::Value(0)));
        assert_eq!(recovered.value(), Some(0));
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;

    #[test]
    fn test_retry_first_attempt_succeeds() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let p = retry(3, move || {
            *counter.lock() += 1;
            Promise::resolve("ok")
        });
        assert_eq!(p.value(), Some("ok"));
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_retry_gives_up_with_last_reason() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let p = retry::<i32, _>(2, move || {
            let attempt = {
                let mut n = counter.lock();
                *n += 1;
                *n
            };
            Promise::reject(anyhow::anyhow!("attempt {}", attempt))
        });
        assert_eq!(p.reason().unwrap().to_string(), "attempt 3");
        assert_eq!(*calls.lock(), 3);
    }

    #[test]
    fn test_retry_zero_times_is_single_attempt() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let p = retry::<i32, _>(0, move || {
            *counter.lock() += 1;
            Promise::reject(anyhow::anyhow!("once"))
        });
        assert!(p.is_rejected());
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_retry_waits_for_pending_attempts() {
        let resolvers = Arc::new(Mutex::new(Vec::new()));
        let pending = resolvers.clone();
        let p = retry(1, move || {
            let (attempt, resolver) = Promise::<u8>::pending();
            pending.lock().push(resolver);
            attempt
        });

        assert!(p.is_pending());
        let first = resolvers.lock().remove(0);
        first.reject(anyhow::anyhow!("timeout"));
        assert!(p.is_pending());

        let second = resolvers.lock().remove(0);
        second.resolve(9);
        assert_eq!(p.value(), Some(9));
    }
}

#[cfg(test)]
mod adapt_tests {
    use super::*;

    #[test]
    fn test_from_callback_error() {
        let p = from_callback::<(), _>(|done| done(Err(anyhow::anyhow!("ENOENT"))));
        assert_eq!(p.reason().unwrap().to_string(), "ENOENT");
    }

    #[test]
    fn test_from_callback_later() {
        let slot: Arc<Mutex<Option<Callback<String>>>> = Arc::new(Mutex::new(None));
        let keep = slot.clone();
        let p = from_callback(move |done| *keep.lock() = Some(done));
        assert!(p.is_pending());

        let done = slot.lock().take().unwrap();
        done(Ok("late".to_string()));
        assert_eq!(p.value(), Some("late".to_string()));
    }

    #[test]
    fn test_from_callback_dropped_callback_stays_pending() {
        let p = from_callback::<i32, _>(drop);
        assert!(p.is_pending());
    }

    #[test]
    fn test_promisify_binds_arguments_per_call() {
        let read = promisify(|name: &'static str, done: Callback<usize>| done(Ok(name.len())));
        assert_eq!(read("a.txt").value(), Some(5));
        assert_eq!(read("bb").value(), Some(2));
    }

    #[test]
    fn test_into_callback_roundtrip() {
        let seen = Arc::new(Mutex::new(None));
        let out = seen.clone();
        let (p, resolver) = Promise::<i32>::pending();
        p.into_callback(move |result| *out.lock() = Some(result.map_err(|r| r.to_string())));
        assert!(seen.lock().is_none());

        resolver.reject(anyhow::anyhow!("late failure"));
        assert_eq!(*seen.lock(), Some(Err("late failure".to_string())));
    }
}

use tracing::error;

use crate::runtime::promise::Promise;

/// Fire and forget.
///
/// The promise keeps running; if it rejects, the reason is logged at `error`
/// level instead of being dropped silently.
pub fn detach<T>(promise: &Promise<T>)
where
    T: Clone + Send + 'static,
{
    promise.subscribe(|outcome| {
        if let Err(reason) = outcome {
            error!(%reason, "detached promise rejected");
        }
    });
}

//! Combinators over many promises
//!
//! Inputs are [`Resolution`]s: `Value` counts as already fulfilled and is
//! taken into account immediately, `Deferred` is observed through the usual
//! reaction path. Results keep input order.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{AggregateError, Promise, Reason, Resolution, Status};

/// One entry of [`Promise::all_settled`]'s result.
#[derive(Debug, Clone)]
pub enum Settlement<T> {
    Fulfilled { value: T },
    Rejected { reason: Reason },
}

impl<T> Settlement<T> {
    pub fn status(&self) -> Status {
        match self {
            Settlement::Fulfilled { .. } => Status::Fulfilled,
            Settlement::Rejected { .. } => Status::Rejected,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Settlement::Fulfilled { value } => Some(value),
            Settlement::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Settlement::Fulfilled { .. } => None,
            Settlement::Rejected { reason } => Some(reason),
        }
    }
}

impl<T> From<Result<T, Reason>> for Settlement<T> {
    fn from(result: Result<T, Reason>) -> Self {
        match result {
            Ok(value) => Settlement::Fulfilled { value },
            Err(reason) => Settlement::Rejected { reason },
        }
    }
}

/// Index-preserving collector shared by the inputs of one combinator call.
struct Gather<V> {
    slots: Vec<Option<V>>,
    remaining: usize,
    done: bool,
}

impl<V> Gather<V> {
    fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            remaining: len,
            done: false,
        }
    }

    /// Store `item` at `index`. Returns every item, in order, once the last
    /// slot is filled.
    fn fill(
        &mut self,
        index: usize,
        item: V,
    ) -> Option<Vec<V>> {
        if self.done {
            return None;
        }
        self.slots[index] = Some(item);
        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }
        self.done = true;
        Some(mem::take(&mut self.slots).into_iter().flatten().collect())
    }

    /// Stop collecting. True only for the call that actually stopped it.
    fn short_circuit(&mut self) -> bool {
        self.slots.clear();
        !mem::replace(&mut self.done, true)
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Fulfill with every input's value once all fulfill; reject with the
    /// first rejection.
    ///
    /// ```
    /// use yaoxiang_promise::{Promise, Resolution};
    ///
    /// let all = Promise::all(vec![
    ///     Resolution::Value(1),
    ///     Resolution::Value(2),
    ///     Promise::resolve(3).into(),
    /// ]);
    /// assert_eq!(all.value(), Some(vec![1, 2, 3]));
    /// ```
    pub fn all<I>(inputs: I) -> Promise<Vec<T>>
    where
        I: IntoIterator<Item = Resolution<T>>,
    {
        let inputs: Vec<_> = inputs.into_iter().collect();
        if inputs.is_empty() {
            return Promise::resolve(Vec::new());
        }

        let (promise, resolver) = Promise::pending();
        let gather = Arc::new(Mutex::new(Gather::new(inputs.len())));
        for (index, input) in inputs.into_iter().enumerate() {
            let gather = gather.clone();
            let resolver = resolver.clone();
            observe(input, move |outcome| match outcome {
                Ok(value) => {
                    let values = gather.lock().fill(index, value);
                    if let Some(values) = values {
                        resolver.resolve(values);
                    }
                }
                Err(reason) => {
                    let first = gather.lock().short_circuit();
                    if first {
                        resolver.reject(reason);
                    }
                }
            });
        }
        promise
    }

    /// Fulfill with a [`Settlement`] per input once every input settled.
    pub fn all_settled<I>(inputs: I) -> Promise<Vec<Settlement<T>>>
    where
        I: IntoIterator<Item = Resolution<T>>,
    {
        let inputs: Vec<_> = inputs.into_iter().collect();
        if inputs.is_empty() {
            return Promise::resolve(Vec::new());
        }

        let (promise, resolver) = Promise::pending();
        let gather = Arc::new(Mutex::new(Gather::new(inputs.len())));
        for (index, input) in inputs.into_iter().enumerate() {
            let gather = gather.clone();
            let resolver = resolver.clone();
            observe(input, move |outcome| {
                let settlements = gather.lock().fill(index, Settlement::from(outcome));
                if let Some(settlements) = settlements {
                    resolver.resolve(settlements);
                }
            });
        }
        promise
    }

    /// Fulfill with the first input to fulfill. Reject with an
    /// [`AggregateError`] of all reasons, in input order, if every input
    /// rejects; an empty input rejects right away with no reasons.
    pub fn any<I>(inputs: I) -> Promise<T>
    where
        I: IntoIterator<Item = Resolution<T>>,
    {
        let inputs: Vec<_> = inputs.into_iter().collect();
        if inputs.is_empty() {
            return Promise::reject(AggregateError::new(Vec::new()));
        }

        let (promise, resolver) = Promise::pending();
        let gather = Arc::new(Mutex::new(Gather::new(inputs.len())));
        for (index, input) in inputs.into_iter().enumerate() {
            let gather = gather.clone();
            let resolver = resolver.clone();
            observe(input, move |outcome| match outcome {
                Ok(value) => {
                    let first = gather.lock().short_circuit();
                    if first {
                        resolver.resolve(value);
                    }
                }
                Err(reason) => {
                    let reasons = gather.lock().fill(index, reason);
                    if let Some(reasons) = reasons {
                        resolver.reject(AggregateError::new(reasons));
                    }
                }
            });
        }
        promise
    }

    /// Settle like the first input to settle, either way.
    ///
    /// An empty input never settles.
    pub fn race<I>(inputs: I) -> Promise<T>
    where
        I: IntoIterator<Item = Resolution<T>>,
    {
        let (promise, resolver) = Promise::pending();
        for input in inputs {
            if resolver.is_claimed() {
                break;
            }
            let resolver = resolver.clone();
            observe(input, move |outcome| resolver.settle_result(outcome));
        }
        promise
    }
}

/// Feed `input` to `reaction`: immediately for a value, at settlement for a
/// promise.
fn observe<T, F>(
    input: Resolution<T>,
    reaction: F,
) where
    T: Clone + Send + 'static,
    F: FnOnce(Result<T, Reason>) + Send + 'static,
{
    match input {
        Resolution::Value(value) => reaction(Ok(value)),
        Resolution::Deferred(promise) => promise.subscribe(reaction),
    }
}

//! Rejection reasons
//!
//! A promise rejects with an arbitrary error value. [`Reason`] erases the
//! concrete type behind an `anyhow::Error` and shares it, so one rejection can
//! be handed to every reaction that observes it.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The reason a promise was rejected.
///
/// Cheap to clone. Displays as the wrapped error and can be downcast back to
/// the value it was created from.
///
/// ```
/// use yaoxiang_promise::Reason;
///
/// let reason = Reason::msg("boom");
/// assert_eq!(reason.to_string(), "boom");
/// assert_eq!(reason.downcast_ref::<&str>(), Some(&"boom"));
/// ```
#[derive(Clone)]
pub struct Reason(Arc<anyhow::Error>);

impl Reason {
    /// Wrap a concrete error type.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::from(anyhow::Error::new(error))
    }

    /// Build a reason from a plain message or value.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::msg(message)))
    }

    /// Borrow the wrapped value if it has type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Check whether the wrapped value has type `E`.
    #[inline]
    pub fn is<E>(&self) -> bool
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.is::<E>()
    }

    /// The underlying `anyhow::Error`.
    #[inline]
    pub fn as_error(&self) -> &anyhow::Error {
        &self.0
    }

    /// Whether both reasons are the same rejection (not merely equal text).
    #[inline]
    pub fn ptr_eq(
        &self,
        other: &Reason,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<anyhow::Error> for Reason {
    fn from(error: anyhow::Error) -> Self {
        // A reason re-raised through `?` comes back wrapped once; unwrap it.
        match error.downcast::<Reason>() {
            Ok(reason) => reason,
            Err(error) => Self(Arc::new(error)),
        }
    }
}

impl From<PromiseError> for Reason {
    fn from(error: PromiseError) -> Self {
        Self::new(error)
    }
}

impl From<AggregateError> for Reason {
    fn from(error: AggregateError) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Reason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Reason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl std::error::Error for Reason {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Errors produced by the promise machinery itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// A promise was resolved with itself.
    #[error("a promise cannot be resolved with itself")]
    Cycle,
}

/// Rejection reason of [`Promise::any`](super::Promise::any) when no input
/// fulfilled. Holds every input's reason in input order.
#[derive(Debug, Clone, Error)]
#[error("no promise resolved ({} rejected)", .reasons.len())]
pub struct AggregateError {
    reasons: Vec<Reason>,
}

impl AggregateError {
    /// Create an aggregate over the given reasons.
    pub fn new(reasons: Vec<Reason>) -> Self {
        Self { reasons }
    }

    /// The collected reasons, in input order.
    #[inline]
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn into_reasons(self) -> Vec<Reason> {
        self.reasons
    }
}

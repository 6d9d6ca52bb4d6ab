//! Helpers layered on top of [`Promise`](crate::Promise).
//!
//! - [`detach`] runs a promise for its side effects and reports an
//!   unobserved rejection through `tracing`.
//! - [`retry`] re-invokes a promise-returning operation until it fulfills
//!   or the retry limit is reached.
//! - [`from_callback`] and [`promisify`] turn callback-style routines into
//!   promise-returning ones; [`Promise::into_callback`](crate::Promise::into_callback)
//!   goes the other way.

mod adapt;
mod detach;
mod retry;

#[doc(inline)]
pub use adapt::{from_callback, promisify, Callback};
#[doc(inline)]
pub use detach::detach;
#[doc(inline)]
pub use retry::retry;

#[cfg(test)]
mod tests;

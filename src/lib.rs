//! YaoXiang deferred values
//!
//! Promises with chaining, settlement combinators and a FIFO task queue.
//!
//! # Example
//!
//! ```
//! use yaoxiang_promise::{Promise, Resolution, TaskQueue};
//!
//! let queue = TaskQueue::new();
//! let (reply, deliver) = Promise::<String>::pending();
//!
//! let sent = queue.submit(move || Ok(Resolution::Deferred(reply)));
//! let length = sent.then(|text| Ok(Resolution::Value(text.len())));
//!
//! deliver.resolve("hello".to_string());
//! assert_eq!(length.value(), Some(5));
//! ```

#![doc(html_root_url = "https://docs.rs/yaoxiang-promise")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod runtime;
pub mod tools;

// Utility modules
pub mod util;

// Re-exports
pub use runtime::promise::{
    AggregateError, Outcome, Promise, PromiseError, Reason, Resolution, Resolver, Settlement,
    Status,
};
pub use runtime::scheduler::{QueueConfig, QueueError, TaskId, TaskQueue, TaskState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "YaoXiang (爻象) promise";

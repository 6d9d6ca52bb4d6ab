//! Runtime system
//!
//! This module contains deferred values and the task queue that serializes
//! work built on them.

pub mod promise;
pub mod scheduler;

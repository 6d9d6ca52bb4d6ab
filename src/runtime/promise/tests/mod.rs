//! Promise 单元测试
//!
//! 覆盖状态机、反应链、组合器以及 Future 集成


use crate::runtime::promise::{Outcome, Resolution};

/// Shorthand for a handler that continues with a plain value.
pub(super) fn value<T>(value: T) -> Outcome<T> {
    Ok(Resolution::Value(value))
}

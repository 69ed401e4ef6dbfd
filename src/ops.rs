//! Operators that turn an observable into something else.

pub mod into_future;

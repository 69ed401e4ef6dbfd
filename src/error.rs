//! Error types.
//!
//! Stream failures are never represented here: an `Err` pushed through
//! `Observer::error` is caller data and reaches consumers untouched. These
//! enums only describe misuse of the crate's own API.

/// Errors reported synchronously by subject operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
  /// The consumer passed to `try_subscribe` was already closed, so it cannot
  /// accept any notification. Nothing was registered.
  #[error("observer is already closed and cannot be subscribed")]
  ObserverClosed,
}

/// Errors that can prevent an observable future from resolving to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntoFutureError {
  /// The observable completed without a value.
  #[error("the observable has no values")]
  Empty,

  /// The observable emitted more than one value.
  #[error("the observable emitted more than one value")]
  MultipleValues,

  /// The observable dropped its observer before sending a terminal
  /// notification.
  #[error("the observable was dropped before it terminated")]
  Abandoned,
}

/// The result type for `into_future()`.
///
/// - `Ok(Ok(value))` - Observable emitted exactly one value
/// - `Ok(Err(error))` - Observable emitted an error
/// - `Err(IntoFutureError)` - no single value could be produced
pub type IntoFutureResult<T, E> = Result<Result<T, E>, IntoFutureError>;

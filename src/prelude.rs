//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Notification record used by the unit tests
#[cfg(test)]
pub(crate) use crate::test_util::Notification;
pub use crate::{
  error::{IntoFutureError, IntoFutureResult, SubjectError},
  observable::{create, Create, Observable},
  observer::{BoxedObserver, DynObserver, Emitter, FnMutObserver, Observer, ObserverAll},
  ops::into_future::{IntoFutureObserver, ObservableFuture},
  rc::MutRc,
  signal::AbortSignal,
  subject::*,
  subscription::*,
};

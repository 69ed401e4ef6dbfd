//! IntoFuture operator implementation
//!
//! Converts an Observable into a Future that resolves with the single value
//! the observable emits.
//!
//! ## Behavior
//!
//! - **Single value**: the future resolves with `Ok(Ok(value))`
//! - **Error from observable**: the future resolves with `Ok(Err(error))`
//! - **Empty observable**: completing without a value resolves with
//!   `Err(IntoFutureError::Empty)`
//! - **Multiple values**: resolves with `Err(IntoFutureError::MultipleValues)`
//!   as soon as the second value arrives
//! - **Abandoned**: if the observable drops the observer without a terminal
//!   notification, resolves with `Err(IntoFutureError::Abandoned)`
//!
//! An [`AsyncSubject`](crate::subject::AsyncSubject) emits at most one value,
//! so awaiting it yields its final value once the source completes.
//!
//! ```rust
//! use futures::executor::block_on;
//! use rxsubject::prelude::*;
//!
//! let subject = AsyncSubject::<i32, ()>::new();
//! let fut = subject.clone().into_future();
//! subject.clone().next(1);
//! subject.clone().next(2);
//! subject.clone().complete();
//! assert_eq!(block_on(fut), Ok(Ok(2)));
//! ```

use std::{
  cell::RefCell,
  future::Future,
  pin::Pin,
  rc::Rc,
  task::{Context as TaskContext, Poll, Waker},
};

pub use crate::error::{IntoFutureError, IntoFutureResult};
use crate::observer::Observer;

// ============================================================================
// Internal State
// ============================================================================

pub(crate) enum State<Item, Err> {
  /// No value received yet
  Empty,
  /// Exactly one value received
  HasValue(Item),
  /// More than one value received
  MultipleValues,
  /// An error was received
  Error(Err),
  /// The observer was dropped before a terminal notification
  Abandoned,
}

/// Shared state between Future and Observer
pub(crate) struct SharedState<Item, Err> {
  pub(crate) state: State<Item, Err>,
  pub(crate) waker: Option<Waker>,
  pub(crate) completed: bool,
}

impl<Item, Err> SharedState<Item, Err> {
  fn new() -> Self { Self { state: State::Empty, waker: None, completed: false } }
}

// ============================================================================
// ObservableFuture
// ============================================================================

/// A future that resolves with the value emitted by an observable.
///
/// Works for synchronous and asynchronous sources alike: the observer stores
/// the outcome in shared state and wakes the task that last polled.
pub struct ObservableFuture<Item, Err> {
  shared: Rc<RefCell<SharedState<Item, Err>>>,
}

impl<Item, Err> Future for ObservableFuture<Item, Err> {
  type Output = IntoFutureResult<Item, Err>;

  fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
    let mut shared = self.shared.borrow_mut();
    if shared.completed {
      let result = match std::mem::replace(&mut shared.state, State::Empty) {
        State::Empty => Err(IntoFutureError::Empty),
        State::HasValue(v) => Ok(Ok(v)),
        State::MultipleValues => Err(IntoFutureError::MultipleValues),
        State::Error(e) => Ok(Err(e)),
        State::Abandoned => Err(IntoFutureError::Abandoned),
      };
      Poll::Ready(result)
    } else {
      shared.waker = Some(cx.waker().clone());
      Poll::Pending
    }
  }
}

// ============================================================================
// IntoFutureObserver
// ============================================================================

/// Observer feeding an [`ObservableFuture`].
pub struct IntoFutureObserver<Item, Err> {
  shared: Rc<RefCell<SharedState<Item, Err>>>,
}

impl<Item, Err> IntoFutureObserver<Item, Err> {
  pub(crate) fn new(shared: Rc<RefCell<SharedState<Item, Err>>>) -> Self { Self { shared } }

  /// Wake the future if a waker is registered
  fn wake(&self) {
    let waker = self.shared.borrow_mut().waker.take();
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for IntoFutureObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let mut shared = self.shared.borrow_mut();
    match &shared.state {
      State::Empty => shared.state = State::HasValue(value),
      State::HasValue(_) => {
        shared.state = State::MultipleValues;
        shared.completed = true;
        drop(shared);
        self.wake();
      }
      // Already settled
      State::MultipleValues | State::Error(_) | State::Abandoned => {}
    }
  }

  fn error(self, err: Err) {
    {
      let mut shared = self.shared.borrow_mut();
      if shared.completed {
        return;
      }
      shared.state = State::Error(err);
      shared.completed = true;
    }
    self.wake();
  }

  fn complete(self) {
    self.shared.borrow_mut().completed = true;
    self.wake();
  }

  fn is_closed(&self) -> bool { self.shared.borrow().completed }
}

impl<Item, Err> Drop for IntoFutureObserver<Item, Err> {
  fn drop(&mut self) {
    {
      let mut shared = self.shared.borrow_mut();
      if shared.completed {
        return;
      }
      shared.state = State::Abandoned;
      shared.completed = true;
    }
    tracing::trace!("observable dropped its future observer before terminating");
    self.wake();
  }
}

// ============================================================================
// Factory Function
// ============================================================================

/// Creates a future from an observable.
///
/// `subscribe_fn` receives the observer to subscribe with; the returned future
/// resolves once that observer settles.
pub fn observable_into_future<T, E, F>(subscribe_fn: F) -> ObservableFuture<T, E>
where
  F: FnOnce(IntoFutureObserver<T, E>),
{
  let shared = Rc::new(RefCell::new(SharedState::new()));
  let observer = IntoFutureObserver::new(shared.clone());
  subscribe_fn(observer);

  ObservableFuture { shared }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use futures::{executor::block_on, task::noop_waker};

  use super::*;
  use crate::prelude::*;

  fn poll_once<T, E>(fut: &mut ObservableFuture<T, E>) -> Poll<IntoFutureResult<T, E>> {
    let waker = noop_waker();
    let mut cx = std::task::Context::from_waker(&waker);
    Pin::new(fut).poll(&mut cx)
  }

  #[test]
  fn test_into_future_single_value() {
    let fut = create(|emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(42);
      emitter.complete();
    })
    .into_future();
    assert_eq!(block_on(fut), Ok(Ok(42)));
  }

  #[test]
  fn test_into_future_empty_observable() {
    let fut = create(|emitter: &mut dyn Emitter<i32, ()>| emitter.complete()).into_future();
    assert_eq!(block_on(fut), Err(IntoFutureError::Empty));
  }

  #[test]
  fn test_into_future_multiple_values() {
    let fut = create(|emitter: &mut dyn Emitter<i32, ()>| {
      for v in 1..=3 {
        emitter.next(v);
      }
      emitter.complete();
    })
    .into_future();
    assert_eq!(block_on(fut), Err(IntoFutureError::MultipleValues));
  }

  #[test]
  fn test_into_future_error() {
    let fut = create(|emitter: &mut dyn Emitter<i32, String>| {
      emitter.error("test error".to_string());
    })
    .into_future();
    assert_eq!(block_on(fut), Ok(Err("test error".to_string())));
  }

  #[test]
  fn dropped_observer_abandons_the_future() {
    // The emitter is dropped without a terminal notification.
    let fut = create(|emitter: &mut dyn Emitter<i32, ()>| emitter.next(1)).into_future();
    assert_eq!(block_on(fut), Err(IntoFutureError::Abandoned));
  }

  #[test]
  fn pending_until_the_subject_completes() {
    let subject = Subject::<i32, ()>::new();
    let mut fut = subject.clone().into_future();
    assert!(poll_once(&mut fut).is_pending());

    subject.clone().next(7);
    assert!(poll_once(&mut fut).is_pending());

    subject.clone().complete();
    assert_eq!(poll_once(&mut fut), Poll::Ready(Ok(Ok(7))));
  }

  #[test]
  fn dropping_every_subject_handle_abandons_the_future() {
    let subject = Subject::<i32, ()>::new();
    let fut = subject.clone().into_future();
    drop(subject);
    assert_eq!(block_on(fut), Err(IntoFutureError::Abandoned));
  }
}

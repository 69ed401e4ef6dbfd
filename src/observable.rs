//! The `Observable` trait: anything an [`Observer`] can subscribe to.
//!
//! Subscribing consumes the observable value. Subjects are cheap handles, so
//! subscribing to one is written `subject.clone().subscribe(..)`.

mod create;

pub use create::{create, Create};

use crate::{
  observer::{FnMutObserver, Observer, ObserverAll},
  ops::into_future::{observable_into_future, ObservableFuture},
  subscription::Subscription,
};

/// A source of `Item`s that may fail with `Err`.
///
/// `'a` bounds the lifetime of the observers the source can hold on to.
pub trait Observable<'a, Item, Err>: Sized {
  /// Handle returned by every subscribe method.
  type Unsub: Subscription;

  /// Attach `observer` and start delivering notifications to it.
  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a;

  /// Subscribe with a `next` handler only; errors and completion are ignored.
  fn subscribe<N>(self, next: N) -> Self::Unsub
  where
    N: FnMut(Item) + 'a,
  {
    self.actual_subscribe(FnMutObserver(next))
  }

  /// Subscribe with one handler per notification kind.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Self::Unsub
  where
    N: FnMut(Item) + 'a,
    E: FnOnce(Err) + 'a,
    C: FnOnce() + 'a,
  {
    self.actual_subscribe(ObserverAll::new(next, error, complete))
  }

  /// Resolve to the single value this observable emits.
  ///
  /// See [`ObservableFuture`] for how the other outcomes are reported.
  fn into_future(self) -> ObservableFuture<Item, Err>
  where
    Item: 'a,
    Err: 'a,
  {
    observable_into_future(|observer| {
      // The future owns the result; the subscription handle is not needed.
      let _ = self.actual_subscribe(observer);
    })
  }
}

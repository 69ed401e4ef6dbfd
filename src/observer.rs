//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use crate::rc::MutRc;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Taking `self` in the terminal methods means an observer can
/// see at most one of `error` / `complete`, and nothing after it.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  fn error(self, err: Err);

  /// Handle completion of the observable
  fn complete(self);

  /// Checks if the observer is closed.
  ///
  /// A closed observer has lost interest: sources stop emitting to it and
  /// subjects drop it on the next broadcast.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to an Observer via mutable reference.
///
/// Unlike `Observer`, which consumes `self` for `error` and `complete`,
/// `Emitter` takes `&mut self` for all methods so that `create` closures can
/// drive any observer through `&mut dyn Emitter` without knowing its type.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because the terminal methods
/// take `self` by value. DynObserver mirrors the interface for vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed value observer (single-threaded, no Send bound)
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserver<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Closure as a `next` handler; `error` and `complete` are ignored.
///
/// This enables ergonomic subscription syntax:
/// `subject.subscribe(|v| println!("{}", v))`.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, _err: Err) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer built from one closure per notification kind.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Observer implementations for Option and reference-counted Option wrappers
// ============================================================================

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Observer::is_closed) }
}

/// MutRc<Option<O>> - shared ownership observer
/// Uses take() for terminal operations to consume the inner observer
impl<O, Item, Err> Observer<Item, Err> for MutRc<Option<O>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.rc_deref_mut().next(value); }

  fn error(self, err: Err) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.error(err);
    }
  }

  fn complete(self) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.rc_deref().is_closed() }
}

// ============================================================================
// Tests
// ============================================================================

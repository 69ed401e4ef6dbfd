//! Subscription handles.
//!
//! A subscription is the control handle returned by `subscribe`; calling
//! [`Subscription::unsubscribe`] detaches the consumer before the source has
//! finished.

mod dynamic;

pub use dynamic::DynamicSubscriptions;

pub trait Subscription {
  /// Detach the consumer. Unsubscribing an already closed subscription does
  /// nothing.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }
}

/// Subscription of a source that has nothing to tear down.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(Some(subscription)) }

  /// Give the subscription back without unsubscribing it.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }
}

impl<T: Subscription> Subscription for SubscriptionGuard<T> {
  fn unsubscribe(mut self) {
    if let Some(inner) = self.0.take() {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.as_ref().map_or(true, Subscription::is_closed) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(inner) = self.0.take() {
      inner.unsubscribe();
    }
  }
}

use std::marker::PhantomData;

use crate::{
  observable::Observable,
  observer::{Emitter, Observer},
  subscription::Subscription,
};

/// Observable created from a function.
///
/// This struct is created by [`create`].
#[derive(Clone)]
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<(Item, Err)>,
}

impl<F, Item, Err> Create<F, Item, Err> {
  pub fn new(f: F) -> Self { Self { f, _marker: PhantomData } }
}

/// Build a cold observable from a function that drives an [`Emitter`].
///
/// The function runs once per subscription. Whatever it returns is the
/// subscription handle, so it can hand back teardown logic or just `()`.
/// After `error` or `complete` the emitter drops its observer and ignores
/// everything else.
///
/// ```rust
/// use rxsubject::prelude::*;
///
/// let subject = AsyncSubject::<i32, ()>::new();
/// create(|emitter: &mut dyn Emitter<i32, ()>| {
///   for v in 1..=5 {
///     emitter.next(v);
///   }
///   emitter.complete();
/// })
/// .actual_subscribe(subject.clone());
///
/// assert!(subject.is_completed());
/// ```
pub fn create<F, Item, Err, U>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create::new(f)
}

/// Wrapper to implement Emitter for Option<O>
struct CreateEmitter<O>(Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for CreateEmitter<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<'a, F, Item, Err, U> Observable<'a, Item, Err> for Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  type Unsub = U;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    let mut emitter = CreateEmitter(Some(observer));
    (self.f)(&mut emitter)
  }
}

use std::{
  fmt::{Debug, Display, Formatter},
  panic::{catch_unwind, AssertUnwindSafe},
};

use super::{
  replay_subject::ReplaySubject, subject_subscription::SubjectSubscription, subscribers::resume,
};
use crate::{
  error::SubjectError,
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  signal::AbortSignal,
};

/// A subject that only ever emits the last value it received, and only once
/// the source completes.
///
/// Values pushed with `next` are held back; each one replaces the previous.
/// On `complete` the held value (if any) is released to every subscriber,
/// followed by completion, and replayed the same way to anyone subscribing
/// later. On `error` the held value is dropped and only the error is
/// delivered. The first terminal notification wins; everything after it is
/// ignored.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let subject = AsyncSubject::<i32, ()>::new();
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// subject.clone().next(1);
/// subject.clone().next(2);
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
/// subject.clone().next(3);
/// assert!(seen.borrow().is_empty());
///
/// subject.clone().complete();
/// assert_eq!(*seen.borrow(), vec![3]);
///
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![3, 3]);
/// ```
pub struct AsyncSubject<'a, Item, Err> {
  replay: ReplaySubject<'a, Item, Err>,
  stage: MutRc<Stage<Item>>,
}

/// Where the subject is in its lifecycle. Leaving `Active` is the terminal
/// transition, so calls made while the value is being released are ignored.
enum Stage<Item> {
  Active(Option<Item>),
  Releasing,
  Done,
}

impl<'a, Item, Err> AsyncSubject<'a, Item, Err> {
  pub fn new() -> Self {
    Self { replay: ReplaySubject::new(1), stage: MutRc::own(Stage::Active(None)) }
  }

  /// Aborts on the first `complete` or `error`.
  #[inline]
  pub fn signal(&self) -> &AbortSignal { self.replay.signal() }

  /// Whether a value is held back or was released on completion.
  pub fn has_value(&self) -> bool {
    matches!(*self.stage.rc_deref(), Stage::Active(Some(_))) || self.replay.buffered() > 0
  }

  pub fn is_completed(&self) -> bool { self.replay.is_completed() }

  pub fn is_errored(&self) -> bool { self.replay.is_errored() }

  pub fn subscriber_count(&self) -> usize { self.replay.subscriber_count() }

  fn is_stopped(&self) -> bool { !matches!(*self.stage.rc_deref(), Stage::Active(_)) }

  /// Leave `Active` for `to`, handing back the held value. `None` if the
  /// subject had already left it.
  fn finish(&self, to: Stage<Item>) -> Option<Option<Item>> {
    let mut stage = self.stage.rc_deref_mut();
    match std::mem::replace(&mut *stage, to) {
      Stage::Active(held) => Some(held),
      previous => {
        *stage = previous;
        None
      }
    }
  }
}

impl<'a, Item: Clone, Err: Clone> AsyncSubject<'a, Item, Err> {
  /// Like [`Observable::actual_subscribe`], but refuses an observer that is
  /// already closed instead of silently returning a closed subscription.
  pub fn try_subscribe<O>(&self, observer: O) -> Result<SubjectSubscription<'a, Item, Err>, SubjectError>
  where
    O: Observer<Item, Err> + 'a,
  {
    if observer.is_closed() {
      return Err(SubjectError::ObserverClosed);
    }
    Ok(self.clone().actual_subscribe(observer))
  }
}

impl<'a, Item, Err> Clone for AsyncSubject<'a, Item, Err> {
  fn clone(&self) -> Self { Self { replay: self.replay.clone(), stage: self.stage.clone() } }
}

impl<'a, Item, Err> Default for AsyncSubject<'a, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<'a, Item, Err> Display for AsyncSubject<'a, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str("AsyncSubject") }
}

impl<'a, Item, Err> Debug for AsyncSubject<'a, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AsyncSubject")
      .field("has_value", &self.has_value())
      .field("subscribers", &self.subscriber_count())
      .field("stopped", &self.is_stopped())
      .finish()
  }
}

impl<'a, Item: Clone, Err: Clone> Observer<Item, Err> for AsyncSubject<'a, Item, Err> {
  fn next(&mut self, value: Item) {
    let replaced = match &mut *self.stage.rc_deref_mut() {
      Stage::Active(pending) => pending.replace(value),
      Stage::Releasing | Stage::Done => return,
    };
    drop(replaced);
  }

  fn error(self, err: Err) {
    let Some(held) = self.finish(Stage::Done) else { return };
    drop(held);
    tracing::debug!("async subject errored");
    self.replay.error(err);
  }

  fn complete(mut self) {
    let Some(held) = self.finish(Stage::Releasing) else { return };
    tracing::debug!(has_value = held.is_some(), "async subject completing");
    // Consumers still complete if one panics on the value; the panic is
    // resumed once the stream has terminated.
    let mut panicked = None;
    if let Some(value) = held {
      let replay = &mut self.replay;
      panicked = catch_unwind(AssertUnwindSafe(|| replay.next(value))).err();
    }
    *self.stage.rc_deref_mut() = Stage::Done;
    self.replay.complete();
    resume(panicked);
  }

  fn is_closed(&self) -> bool { self.is_stopped() }
}

impl<'a, Item: Clone, Err: Clone> Observable<'a, Item, Err> for AsyncSubject<'a, Item, Err> {
  type Unsub = SubjectSubscription<'a, Item, Err>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    self.replay.actual_subscribe(observer)
  }
}

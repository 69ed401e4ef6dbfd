use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use super::{
  subject_subscription::SubjectSubscription,
  subscribers::{guarded, resume, Subscribers, Terminal},
};
use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  signal::AbortSignal,
};

pub(crate) struct SubjectCore<'a, Item, Err> {
  pub(crate) subscribers: Subscribers<'a, Item, Err>,
  pub(crate) terminal: Option<Terminal<Err>>,
}

impl<'a, Item, Err> Default for SubjectCore<'a, Item, Err> {
  fn default() -> Self { Self { subscribers: Subscribers::default(), terminal: None } }
}

/// Subject: A hot observable that multicasts values to many observers.
///
/// The `Subject` struct acts as both an `Observer` and an `Observable`.
/// Clones are handles to the same subject, so the consuming `complete` and
/// `error` are called on a clone.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let subject = Subject::<i32, ()>::new();
/// let results = Rc::new(RefCell::new(vec![]));
/// let c_results = results.clone();
///
/// subject.clone().subscribe(move |v| c_results.borrow_mut().push(v));
///
/// subject.clone().next(1);
/// subject.clone().next(2);
/// subject.clone().complete();
/// subject.clone().next(3);
/// assert_eq!(*results.borrow(), vec![1, 2]);
/// ```
///
/// # Delivery
///
/// - The subscriber list is never borrowed while a consumer runs, so
///   `subscribe`/`unsubscribe` from inside a callback take effect at once. A
///   consumer unsubscribed mid-broadcast does not receive the rest of it.
/// - The first `complete`/`error` wins. It aborts [`Subject::signal`], detaches
///   every subscriber and is replayed to anyone subscribing later. Further
///   terminal calls and values are ignored.
/// - A consumer that panics is detached; the remaining consumers are still
///   notified and the panic is resumed when the broadcast is over.
/// - A consumer re-entering the subject with a value while it is being
///   notified does not receive that nested value. A nested terminal
///   notification is delivered to it as soon as its callback returns.
pub struct Subject<'a, Item, Err> {
  pub(crate) core: MutRc<SubjectCore<'a, Item, Err>>,
  signal: AbortSignal,
}

impl<'a, Item, Err> Subject<'a, Item, Err> {
  pub fn new() -> Self { Self { core: MutRc::default(), signal: AbortSignal::new() } }

  /// Aborts on the first terminal notification.
  #[inline]
  pub fn signal(&self) -> &AbortSignal { &self.signal }

  /// Get the number of current subscribers.
  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().subscribers.live() }

  /// Check if there are no subscribers.
  pub fn is_empty(&self) -> bool { self.subscriber_count() == 0 }

  pub fn is_completed(&self) -> bool {
    matches!(self.core.rc_deref().terminal, Some(Terminal::Completed))
  }

  pub fn is_errored(&self) -> bool {
    matches!(self.core.rc_deref().terminal, Some(Terminal::Errored(_)))
  }

  /// Whether a terminal notification has been received.
  #[inline]
  pub fn is_stopped(&self) -> bool { self.signal.is_aborted() }

  fn detach(&self, ids: SmallVec<[usize; 2]>) {
    if ids.is_empty() {
      return;
    }
    let removed: SmallVec<[_; 2]> = {
      let mut core = self.core.rc_deref_mut();
      ids.iter().filter_map(|id| core.subscribers.remove(*id)).collect()
    };
    for subscriber in &removed {
      subscriber.signal.abort();
    }
  }
}

impl<'a, Item: Clone, Err: Clone> Subject<'a, Item, Err> {
  pub(crate) fn broadcast_value(&self, value: Item) {
    let targets = {
      let core = self.core.rc_deref();
      if core.terminal.is_some() {
        return;
      }
      core.subscribers.snapshot()
    };

    let mut panicked = None;
    let mut detached = SmallVec::<[usize; 2]>::new();
    for subscriber in &targets {
      if subscriber.signal.is_aborted() {
        continue;
      }
      let Some(mut slot) = subscriber.observer.try_rc_deref_mut() else {
        tracing::warn!(subscriber = subscriber.id, "skipping re-entrant delivery to a busy observer");
        continue;
      };
      let Some(observer) = slot.as_mut() else { continue };
      if observer.is_closed() {
        detached.push(subscriber.id);
        continue;
      }
      let value = value.clone();
      if !guarded(subscriber.id, &mut panicked, || observer.next(value)) {
        slot.take();
        detached.push(subscriber.id);
      }
      drop(slot);
      subscriber.flush_deferred(&mut panicked);
    }
    self.detach(detached);
    resume(panicked);
  }

  pub(crate) fn broadcast_terminal(&self, terminal: Terminal<Err>) {
    let targets = {
      let mut core = self.core.rc_deref_mut();
      if core.terminal.is_some() {
        return;
      }
      core.terminal = Some(terminal.clone());
      core.subscribers.drain()
    };
    self.signal.abort();
    tracing::debug!(
      subscribers = targets.len(),
      completed = matches!(terminal, Terminal::Completed),
      "subject terminated"
    );

    let mut panicked = None;
    for subscriber in &targets {
      subscriber.terminate(&terminal, &mut panicked);
    }
    resume(panicked);
  }

  /// Attach `observer`, or replay the terminal notification to it if the
  /// subject has already stopped.
  pub(crate) fn register<O>(&self, observer: O) -> SubjectSubscription<'a, Item, Err>
  where
    O: Observer<Item, Err> + 'a,
  {
    let terminal = self.core.rc_deref().terminal.clone();
    if let Some(terminal) = terminal {
      if !observer.is_closed() {
        terminal.notify(observer);
      }
      return SubjectSubscription::closed(self.core.clone());
    }
    if observer.is_closed() {
      return SubjectSubscription::closed(self.core.clone());
    }

    let subscriber = self.core.rc_deref_mut().subscribers.add(Box::new(observer));
    tracing::trace!(subscriber = subscriber.id, "observer subscribed");
    SubjectSubscription::new(self.core.clone(), subscriber.id, subscriber.signal)
  }
}

impl<'a, Item, Err> Clone for Subject<'a, Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone(), signal: self.signal.clone() } }
}

impl<'a, Item, Err> Default for Subject<'a, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<'a, Item, Err> Debug for Subject<'a, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subject")
      .field("subscribers", &self.subscriber_count())
      .field("stopped", &self.is_stopped())
      .finish()
  }
}

impl<'a, Item: Clone, Err: Clone> Observer<Item, Err> for Subject<'a, Item, Err> {
  fn next(&mut self, value: Item) { self.broadcast_value(value); }

  fn error(self, err: Err) { self.broadcast_terminal(Terminal::Errored(err)); }

  fn complete(self) { self.broadcast_terminal(Terminal::Completed); }

  fn is_closed(&self) -> bool { self.is_stopped() }
}

impl<'a, Item: Clone, Err: Clone> Observable<'a, Item, Err> for Subject<'a, Item, Err> {
  type Unsub = SubjectSubscription<'a, Item, Err>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    self.register(observer)
  }
}

// ============================================================================
// Tests
// ============================================================================

use std::{
  any::Any,
  panic::{catch_unwind, AssertUnwindSafe},
};

use smallvec::SmallVec;

use crate::{
  observer::{BoxedObserver, Observer},
  rc::MutRc,
  signal::AbortSignal,
  subscription::DynamicSubscriptions,
};

pub(crate) type PanicPayload = Box<dyn Any + Send>;

/// How a subject stream ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Terminal<Err> {
  Completed,
  Errored(Err),
}

impl<Err: Clone> Terminal<Err> {
  pub(crate) fn notify<Item, O: Observer<Item, Err>>(&self, observer: O) {
    match self {
      Terminal::Completed => observer.complete(),
      Terminal::Errored(err) => observer.error(err.clone()),
    }
  }
}

/// One registered consumer.
///
/// The observer sits in its own cell so a broadcast can run without holding
/// the subscriber list. A busy cell means the observer is inside one of its
/// own callbacks; a terminal notification arriving then is parked in
/// `deferred` and flushed once the callback returns.
pub(crate) struct Subscriber<'a, Item, Err> {
  pub(crate) id: usize,
  pub(crate) observer: MutRc<Option<BoxedObserver<'a, Item, Err>>>,
  pub(crate) signal: AbortSignal,
  pub(crate) deferred: MutRc<Option<Terminal<Err>>>,
}

impl<'a, Item, Err> Clone for Subscriber<'a, Item, Err> {
  fn clone(&self) -> Self {
    Self {
      id: self.id,
      observer: self.observer.clone(),
      signal: self.signal.clone(),
      deferred: self.deferred.clone(),
    }
  }
}

impl<'a, Item, Err: Clone> Subscriber<'a, Item, Err> {
  /// Hand the terminal notification to the observer, or park it if the
  /// observer is busy.
  pub(crate) fn terminate(&self, terminal: &Terminal<Err>, panicked: &mut Option<PanicPayload>) {
    if self.signal.is_aborted() {
      return;
    }
    let Some(mut slot) = self.observer.try_rc_deref_mut() else {
      *self.deferred.rc_deref_mut() = Some(terminal.clone());
      return;
    };
    let observer = slot.take();
    drop(slot);
    self.signal.abort();
    if let Some(observer) = observer.filter(|o| !o.is_closed()) {
      guarded(self.id, panicked, || terminal.notify(observer));
    }
  }

  /// Deliver a terminal notification parked while the observer was busy.
  pub(crate) fn flush_deferred(&self, panicked: &mut Option<PanicPayload>) {
    let terminal = self.deferred.rc_deref_mut().take();
    if let Some(terminal) = terminal {
      self.terminate(&terminal, panicked);
    }
  }
}

/// Subscribers container using DynamicSubscriptions for ID-based management.
pub(crate) struct Subscribers<'a, Item, Err> {
  inner: DynamicSubscriptions<Subscriber<'a, Item, Err>>,
}

impl<'a, Item, Err> Default for Subscribers<'a, Item, Err> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<'a, Item, Err> Subscribers<'a, Item, Err> {
  /// Register an observer and return its entry.
  pub(crate) fn add(&mut self, observer: BoxedObserver<'a, Item, Err>) -> Subscriber<'a, Item, Err> {
    let id = self.inner.reserve_id();
    let subscriber = Subscriber {
      id,
      observer: MutRc::own(Some(observer)),
      signal: AbortSignal::new(),
      deferred: MutRc::own(None),
    };
    self.inner.insert(id, subscriber.clone());
    subscriber
  }

  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<Subscriber<'a, Item, Err>> {
    self.inner.remove(id)
  }

  /// Number of subscribers still accepting notifications.
  pub(crate) fn live(&self) -> usize {
    self.inner.iter().filter(|s| !s.signal.is_aborted()).count()
  }

  /// Handles to every live subscriber, in subscription order.
  pub(crate) fn snapshot(&self) -> SmallVec<[Subscriber<'a, Item, Err>; 2]> {
    self.inner.iter().filter(|s| !s.signal.is_aborted()).cloned().collect()
  }

  /// Remove every subscriber, in subscription order.
  pub(crate) fn drain(&mut self) -> SmallVec<[Subscriber<'a, Item, Err>; 2]> {
    self.inner.drain().collect()
  }
}

/// Run one consumer callback, keeping its panic away from the remaining
/// consumers. The first payload is kept so the caller can resume it once the
/// broadcast is over.
pub(crate) fn guarded(id: usize, panicked: &mut Option<PanicPayload>, f: impl FnOnce()) -> bool {
  match catch_unwind(AssertUnwindSafe(f)) {
    Ok(()) => true,
    Err(payload) => {
      tracing::error!(subscriber = id, "observer panicked during delivery; detaching it");
      panicked.get_or_insert(payload);
      false
    }
  }
}

/// Re-raise the first consumer panic of a finished broadcast.
pub(crate) fn resume(panicked: Option<PanicPayload>) {
  if let Some(payload) = panicked {
    std::panic::resume_unwind(payload);
  }
}

use std::{
  collections::VecDeque,
  fmt::{Debug, Formatter},
};

use super::{subject_core::Subject, subject_subscription::SubjectSubscription};
use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  signal::AbortSignal,
};

/// A subject that records values and replays them to late subscribers.
///
/// At most `capacity` values are kept, oldest evicted first. A late
/// subscriber receives the retained values in order, then the terminal
/// notification if the subject has stopped.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let subject = ReplaySubject::<i32, ()>::new(2);
/// subject.clone().next(1);
/// subject.clone().next(2);
/// subject.clone().next(3);
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![2, 3]);
/// ```
pub struct ReplaySubject<'a, Item, Err> {
  subject: Subject<'a, Item, Err>,
  history: MutRc<VecDeque<Item>>,
  capacity: Option<usize>,
}

impl<'a, Item, Err> ReplaySubject<'a, Item, Err> {
  /// Replay at most `capacity` values. A capacity of zero replays only the
  /// terminal notification.
  pub fn new(capacity: usize) -> Self { Self::with_capacity(Some(capacity)) }

  /// Replay every value ever received.
  pub fn unbounded() -> Self { Self::with_capacity(None) }

  fn with_capacity(capacity: Option<usize>) -> Self {
    Self { subject: Subject::new(), history: MutRc::own(VecDeque::new()), capacity }
  }

  #[inline]
  pub fn capacity(&self) -> Option<usize> { self.capacity }

  /// Number of values a new subscriber would receive.
  pub fn buffered(&self) -> usize { self.history.rc_deref().len() }

  #[inline]
  pub fn signal(&self) -> &AbortSignal { self.subject.signal() }

  #[inline]
  pub fn is_stopped(&self) -> bool { self.subject.is_stopped() }

  pub fn is_completed(&self) -> bool { self.subject.is_completed() }

  pub fn is_errored(&self) -> bool { self.subject.is_errored() }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }
}

impl<'a, Item: Clone, Err> ReplaySubject<'a, Item, Err> {
  fn record(&self, value: &Item) {
    if self.capacity == Some(0) {
      return;
    }
    let mut history = self.history.rc_deref_mut();
    if Some(history.len()) == self.capacity {
      history.pop_front();
    }
    history.push_back(value.clone());
  }
}

impl<'a, Item, Err> Clone for ReplaySubject<'a, Item, Err> {
  fn clone(&self) -> Self {
    Self { subject: self.subject.clone(), history: self.history.clone(), capacity: self.capacity }
  }
}

impl<'a, Item, Err> Debug for ReplaySubject<'a, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ReplaySubject")
      .field("capacity", &self.capacity)
      .field("buffered", &self.buffered())
      .field("subscribers", &self.subscriber_count())
      .field("stopped", &self.is_stopped())
      .finish()
  }
}

impl<'a, Item: Clone, Err: Clone> Observer<Item, Err> for ReplaySubject<'a, Item, Err> {
  fn next(&mut self, value: Item) {
    if self.subject.is_stopped() {
      return;
    }
    self.record(&value);
    self.subject.broadcast_value(value);
  }

  fn error(self, err: Err) { self.subject.error(err) }

  fn complete(self) { self.subject.complete() }

  fn is_closed(&self) -> bool { self.subject.is_stopped() }
}

impl<'a, Item: Clone, Err: Clone> Observable<'a, Item, Err> for ReplaySubject<'a, Item, Err> {
  type Unsub = SubjectSubscription<'a, Item, Err>;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    let replay: Vec<Item> = self.history.rc_deref().iter().cloned().collect();
    for value in replay {
      if observer.is_closed() {
        break;
      }
      observer.next(value);
    }
    self.subject.register(observer)
  }
}

//! Recording observer shared by the unit tests.

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::observer::Observer;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// Collects every notification its observers receive, in order.
pub(crate) struct Recorder<Item, Err> {
  log: Rc<RefCell<Vec<Notification<Item, Err>>>>,
  closed: Rc<Cell<bool>>,
}

impl<Item, Err> Recorder<Item, Err> {
  pub(crate) fn observer(&self) -> RecordingObserver<Item, Err> {
    RecordingObserver { log: self.log.clone(), closed: self.closed.clone() }
  }

  /// Everything recorded since the last call.
  pub(crate) fn take(&self) -> Vec<Notification<Item, Err>> {
    std::mem::take(&mut *self.log.borrow_mut())
  }

  /// Make every observer of this recorder report itself closed.
  pub(crate) fn close(&self) { self.closed.set(true) }
}

impl<Item, Err> Clone for Recorder<Item, Err> {
  fn clone(&self) -> Self { Self { log: self.log.clone(), closed: self.closed.clone() } }
}

impl<Item, Err> Default for Recorder<Item, Err> {
  fn default() -> Self { Self { log: Rc::default(), closed: Rc::default() } }
}

pub(crate) struct RecordingObserver<Item, Err> {
  log: Rc<RefCell<Vec<Notification<Item, Err>>>>,
  closed: Rc<Cell<bool>>,
}

impl<Item, Err> Observer<Item, Err> for RecordingObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.log.borrow_mut().push(Notification::Next(value)); }

  fn error(self, err: Err) { self.log.borrow_mut().push(Notification::Error(err)); }

  fn complete(self) { self.log.borrow_mut().push(Notification::Complete); }

  fn is_closed(&self) -> bool { self.closed.get() }
}

use super::subject_core::SubjectCore;
use crate::{rc::MutRc, signal::AbortSignal, subscription::Subscription};

/// Subscription handle for a Subject.
///
/// Unsubscribing removes the observer from the subject right away, also when
/// called from inside a notification callback. Dropping the handle does not
/// unsubscribe; use [`Subscription::unsubscribe_when_dropped`] for that.
pub struct SubjectSubscription<'a, Item, Err> {
  core: MutRc<SubjectCore<'a, Item, Err>>,
  id: Option<usize>,
  signal: AbortSignal,
}

impl<'a, Item, Err> SubjectSubscription<'a, Item, Err> {
  pub(crate) fn new(core: MutRc<SubjectCore<'a, Item, Err>>, id: usize, signal: AbortSignal) -> Self {
    Self { core, id: Some(id), signal }
  }

  /// A subscription that never registered anything, e.g. because the subject
  /// had already terminated.
  pub(crate) fn closed(core: MutRc<SubjectCore<'a, Item, Err>>) -> Self {
    let signal = AbortSignal::new();
    signal.abort();
    Self { core, id: None, signal }
  }

  /// Aborts once the observer is detached: by `unsubscribe`, after its
  /// terminal notification, or when it reported itself closed.
  #[inline]
  pub fn signal(&self) -> &AbortSignal { &self.signal }
}

impl<'a, Item, Err> Subscription for SubjectSubscription<'a, Item, Err> {
  fn unsubscribe(self) {
    if !self.signal.abort() {
      return;
    }
    if let Some(id) = self.id {
      let removed = self.core.rc_deref_mut().subscribers.remove(id);
      tracing::trace!(subscriber = id, "observer unsubscribed");
      drop(removed);
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.signal.is_aborted() }
}

//! One-shot cancellation signal.
//!
//! An [`AbortSignal`] starts live and can be aborted exactly once. Subjects
//! abort theirs on the first terminal notification; every subject
//! subscription owns its own signal that aborts when the subscriber is
//! detached.

use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::rc::MutRc;

type Listener = Box<dyn FnOnce()>;

#[derive(Default)]
struct SignalState {
  aborted: bool,
  listeners: SmallVec<[Listener; 1]>,
}

/// Shared, read-only view of a one-shot abort flag.
///
/// Clones observe the same flag. Only the crate can abort a signal.
#[derive(Clone, Default)]
pub struct AbortSignal(MutRc<SignalState>);

impl AbortSignal {
  pub(crate) fn new() -> Self { Self::default() }

  #[inline]
  pub fn is_aborted(&self) -> bool { self.0.rc_deref().aborted }

  /// Run `f` once the signal aborts, or right away if it already has.
  pub fn on_abort(&self, f: impl FnOnce() + 'static) {
    let mut state = self.0.rc_deref_mut();
    if state.aborted {
      drop(state);
      f();
    } else {
      state.listeners.push(Box::new(f));
    }
  }

  /// Flip the flag. Returns `true` only for the call that performed the
  /// transition; listeners run after the internal borrow is released.
  pub(crate) fn abort(&self) -> bool {
    let listeners = {
      let mut state = self.0.rc_deref_mut();
      if state.aborted {
        return false;
      }
      state.aborted = true;
      std::mem::take(&mut state.listeners)
    };
    for listener in listeners {
      listener();
    }
    true
  }
}

impl Debug for AbortSignal {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = self.0.rc_deref();
    f.debug_struct("AbortSignal")
      .field("aborted", &state.aborted)
      .field("listeners", &state.listeners.len())
      .finish()
  }
}

//! Reference-counted mutable cells.
//!
//! Every subject handle, subscription and signal in this crate shares its
//! state through a [`MutRc`]. Access is single-threaded; a failed
//! [`MutRc::try_rc_deref_mut`] means the cell is already borrowed further up
//! the call stack, which is how re-entrant delivery is detected.

use std::{
  cell::{Ref, RefCell, RefMut},
  fmt::{Debug, Formatter},
  rc::Rc,
};

pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  /// Borrow mutably unless the cell is already borrowed.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<RefMut<'_, T>> { self.0.try_borrow_mut().ok() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutRc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T: Debug> Debug for MutRc<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.0.try_borrow() {
      Ok(inner) => f.debug_tuple("MutRc").field(&*inner).finish(),
      Err(_) => f.write_str("MutRc(<borrowed>)"),
    }
  }
}

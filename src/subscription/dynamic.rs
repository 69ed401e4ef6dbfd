use smallvec::SmallVec;

/// A container for managing multiple items with ID-based tracking.
///
/// Items keep their insertion order, which is the order subjects deliver
/// notifications in. `SmallVec<[_; 2]>` avoids a heap allocation for the
/// common case of 0-2 items.
///
/// # Examples
///
/// ```rust
/// use rxsubject::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
///
/// let id1 = subs.reserve_id();
/// subs.insert(id1, "first");
/// let id2 = subs.reserve_id();
/// subs.insert(id2, "second");
/// assert_eq!(subs.iter().count(), 2);
///
/// assert_eq!(subs.remove(id1), Some("first"));
/// assert_eq!(subs.iter().copied().collect::<Vec<_>>(), vec!["second"]);
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Reserve the next ID without adding an item.
  ///
  /// Use this with `insert()` when the item needs to know its own ID.
  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Insert an item with a pre-reserved ID.
  #[inline]
  pub fn insert(&mut self, id: usize, item: U) { self.items.push((id, item)); }

  /// Remove an item by ID.
  pub fn remove(&mut self, id: usize) -> Option<U> {
    self.items.iter().position(|(i, _)| *i == id).map(|pos| self.items.remove(pos).1)
  }

  /// Drain all items.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  /// Iterate over all items.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

use super::TreapMultiset;
use crate::raw::RawTreap;

impl TreapMultiset {
    /// Creates an empty multiset with arena slots preallocated for at least
    /// `capacity` distinct keys.
    ///
    /// Duplicates share a slot, so a stream with heavy repetition needs far
    /// fewer slots than it has elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_multiset::TreapMultiset;
    ///
    /// let set = TreapMultiset::with_capacity(16);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawTreap::with_capacity(capacity),
        }
    }

    /// Returns the number of distinct keys the multiset can hold without
    /// reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_multiset::TreapMultiset;
    ///
    /// let set = TreapMultiset::with_capacity(32);
    /// assert_eq!(set.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

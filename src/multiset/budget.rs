use super::TreapMultiset;

impl TreapMultiset {
    /// Returns the maximum number of elements choosable when always taking
    /// the smallest available key first, such that their total does not
    /// exceed `cap`.
    ///
    /// Equivalent to sorting the multiset ascending and measuring the
    /// longest prefix whose sum is at most `cap`, but answered in a single
    /// root-to-leaf descent over the subtree aggregates.
    ///
    /// The answer is fully determined by the multiset contents; the
    /// randomized tree shape never influences it.
    ///
    /// A negative `cap` returns 0. A key of 0 consumes no budget, so all of
    /// its occurrences are always taken whenever `cap >= 0`; the same
    /// applies to negative keys, which only add slack.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_multiset::TreapMultiset;
    ///
    /// let set = TreapMultiset::from([5, 3, 8, 3]);
    ///
    /// // Sorted: [3, 3, 5, 8]; prefix sums 3, 6, 11, 19.
    /// assert_eq!(set.count_within_budget(8), 2);
    /// assert_eq!(set.count_within_budget(11), 3);
    /// assert_eq!(set.count_within_budget(0), 0);
    /// assert_eq!(set.count_within_budget(-1), 0);
    /// ```
    ///
    /// Zero-valued keys are afforded for free:
    ///
    /// ```
    /// use treap_multiset::TreapMultiset;
    ///
    /// let set = TreapMultiset::from([0, 0, 4]);
    /// assert_eq!(set.count_within_budget(0), 2);
    /// ```
    #[must_use]
    pub fn count_within_budget(&self, cap: i64) -> usize {
        self.raw.count_within_budget(cap)
    }
}

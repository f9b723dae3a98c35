//! Eviction planning for a budgeted stream.
//!
//! Given a fixed budget and a sequence of values arriving one at a time,
//! each arrival must itself be kept, and enough of the earlier arrivals must
//! be evicted that the kept total stays within budget. Since evicting an
//! element frees exactly its value, the cheapest plan keeps as many of the
//! smallest earlier values as possible, which is precisely the multiset's
//! budget query applied to the budget left over after admitting the arrival.

use alloc::vec::Vec;

use crate::TreapMultiset;

/// For each index `i`, returns the minimum number of earlier elements that
/// must be removed so that `items[i]` plus the kept earlier elements sum to
/// at most `budget`.
///
/// Earlier elements are always evicted largest-first, so position `i` keeps
/// the `count_within_budget(budget - items[i])` smallest of its
/// predecessors and removes the rest. An element larger than the whole
/// budget forces all `i` predecessors out (and still does not fit by
/// itself).
///
/// # Complexity
///
/// O(n log n) expected for `n` items.
///
/// # Examples
///
/// ```
/// use treap_multiset::admission::min_removals_within_budget;
///
/// // Budget 6. The 7 at index 2 leaves negative headroom, so both earlier
/// // items go; the 1 at index 3 keeps only the 2 from {4, 2, 7}.
/// let removals = min_removals_within_budget(6, &[4, 2, 7, 1]);
/// assert_eq!(removals, [0, 0, 2, 2]);
/// ```
#[must_use]
pub fn min_removals_within_budget(budget: i64, items: &[i64]) -> Vec<usize> {
    let mut seen = TreapMultiset::with_capacity(items.len());
    let mut removals = Vec::with_capacity(items.len());

    for (index, &item) in items.iter().enumerate() {
        let headroom = budget.saturating_sub(item);
        let kept = seen.count_within_budget(headroom);
        removals.push(index - kept);
        seen.insert(item);
    }

    removals
}

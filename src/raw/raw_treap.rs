use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// Seed used by `RawTreap::new()`. Priorities only shape the tree; no query
/// result ever depends on them, so a fixed seed keeps runs reproducible.
const DEFAULT_RNG_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// The treap core backing `TreapMultiset`.
///
/// One node per distinct key, duplicates absorbed into the node's count.
/// All structural mutation is expressed as three-way split and merge, the
/// same way removal-capable treaps are usually written, so insertion and
/// removal share the machinery that keeps the subtree aggregates honest.
#[derive(Clone)]
pub(crate) struct RawTreap {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Source of node priorities.
    rng: SmallRng,
}

impl RawTreap {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self::with_seed(DEFAULT_RNG_SEED)
    }

    /// Creates a new, empty tree drawing priorities from the given seed.
    pub(crate) fn with_seed(seed: u64) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a new tree with arena capacity for `capacity` distinct keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            rng: SmallRng::seed_from_u64(DEFAULT_RNG_SEED),
        }
    }

    /// Returns the arena capacity in distinct keys.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the total number of elements, duplicates included.
    pub(crate) fn len(&self) -> usize {
        self.subtree_size(self.root)
    }

    /// Returns the number of distinct keys.
    pub(crate) fn distinct_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the sum of all elements, duplicates included.
    pub(crate) fn total(&self) -> i128 {
        self.subtree_sum(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes all elements. Keeps the RNG state; a cleared tree does not
    /// replay the priority sequence of a fresh one.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    /// Adds one occurrence of `key`. Never fails; any `i64` is accepted.
    pub(crate) fn insert(&mut self, key: i64) {
        let root = self.root.take();
        let (not_above, above) = self.split_le(root, key);
        let (below, equal) = self.split_lt(not_above, key);

        // The middle range holds at most the one node whose key matches.
        let equal = match equal {
            Some(h) => {
                self.nodes.get_mut(h).increment_count();
                self.recalc(h);
                Some(h)
            }
            None => {
                let priority = self.rng.next_u64();
                Some(self.nodes.alloc(Node::new(key, priority)))
            }
        };

        let low = self.merge(below, equal);
        self.root = self.merge(low, above);
    }

    /// Removes one occurrence of `key`, freeing the node once its count
    /// reaches zero. Returns whether an occurrence was present.
    pub(crate) fn remove(&mut self, key: i64) -> bool {
        let root = self.root.take();
        let (not_above, above) = self.split_le(root, key);
        let (below, equal) = self.split_lt(not_above, key);

        let (equal, removed) = match equal {
            None => (None, false),
            Some(h) if self.nodes.get(h).count() > 1 => {
                self.nodes.get_mut(h).decrement_count();
                self.recalc(h);
                (Some(h), true)
            }
            Some(h) => {
                // Sole occurrence; the equal range is this childless node.
                self.nodes.free(h);
                (None, true)
            }
        };

        let low = self.merge(below, equal);
        self.root = self.merge(low, above);
        removed
    }

    /// Returns the multiplicity of `key`, 0 if absent.
    pub(crate) fn count_of(&self, key: i64) -> usize {
        let mut cursor = self.root;
        while let Some(h) = cursor {
            let node = self.nodes.get(h);
            cursor = match key.cmp(&node.key()) {
                core::cmp::Ordering::Less => node.left(),
                core::cmp::Ordering::Greater => node.right(),
                core::cmp::Ordering::Equal => return node.count(),
            };
        }
        0
    }

    /// Returns the smallest key, if any.
    pub(crate) fn first(&self) -> Option<i64> {
        let mut h = self.root?;
        while let Some(left) = self.nodes.get(h).left() {
            h = left;
        }
        Some(self.nodes.get(h).key())
    }

    /// Returns the largest key, if any.
    pub(crate) fn last(&self) -> Option<i64> {
        let mut h = self.root?;
        while let Some(right) = self.nodes.get(h).right() {
            h = right;
        }
        Some(self.nodes.get(h).key())
    }

    /// Returns how many of the smallest elements fit under `cap`.
    ///
    /// Single top-down descent. At each node the left subtree either fits
    /// entirely (commit it, then take copies of the node's own key) or the
    /// answer lies strictly inside it (descend without committing). The
    /// running `remaining` budget never goes negative, which is what makes
    /// the descend-left case final: once a positive-sum subtree fails to
    /// fit, every longer sorted prefix picks up only larger, positive keys.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn count_within_budget(&self, cap: i64) -> usize {
        if cap < 0 {
            return 0;
        }

        let mut remaining = i128::from(cap);
        let mut kept = 0usize;
        let mut cursor = self.root;

        while let Some(h) = cursor {
            let node = self.nodes.get(h);
            let left_sum = self.subtree_sum(node.left());

            if left_sum > remaining {
                // The full left subtree does not fit; nothing at or above
                // this node is reachable yet.
                cursor = node.left();
                continue;
            }

            kept += self.subtree_size(node.left());
            remaining -= left_sum;

            let key = node.key();
            let count = node.count();

            if key <= 0 {
                // A zero key costs nothing and a negative key returns
                // budget, so every copy is taken.
                kept += count;
                remaining -= i128::from(key) * count as i128;
                cursor = node.right();
                continue;
            }

            let take = (remaining / i128::from(key)).min(count as i128) as usize;
            kept += take;
            remaining -= i128::from(key) * take as i128;

            if take < count {
                // Ran out of budget mid-node; larger keys cannot fit either.
                break;
            }

            cursor = node.right();
        }

        kept
    }

    /// Splits `tree` into (`<= key`, `> key`), recomputing aggregates along
    /// the cut.
    fn split_le(&mut self, tree: Option<Handle>, key: i64) -> (Option<Handle>, Option<Handle>) {
        let Some(h) = tree else {
            return (None, None);
        };

        if self.nodes.get(h).key() <= key {
            let detached = self.nodes.get(h).right();
            let (low, high) = self.split_le(detached, key);
            self.nodes.get_mut(h).set_right(low);
            self.recalc(h);
            (Some(h), high)
        } else {
            let detached = self.nodes.get(h).left();
            let (low, high) = self.split_le(detached, key);
            self.nodes.get_mut(h).set_left(high);
            self.recalc(h);
            (low, Some(h))
        }
    }

    /// Splits `tree` into (`< key`, `>= key`). Paired with `split_le` this
    /// isolates the equal range without computing `key - 1`, which would
    /// overflow at `i64::MIN`.
    fn split_lt(&mut self, tree: Option<Handle>, key: i64) -> (Option<Handle>, Option<Handle>) {
        let Some(h) = tree else {
            return (None, None);
        };

        if self.nodes.get(h).key() < key {
            let detached = self.nodes.get(h).right();
            let (low, high) = self.split_lt(detached, key);
            self.nodes.get_mut(h).set_right(low);
            self.recalc(h);
            (Some(h), high)
        } else {
            let detached = self.nodes.get(h).left();
            let (low, high) = self.split_lt(detached, key);
            self.nodes.get_mut(h).set_left(high);
            self.recalc(h);
            (low, Some(h))
        }
    }

    /// Merges two trees where every key of `a` is less than every key of
    /// `b`, choosing roots by priority so the heap order survives.
    fn merge(&mut self, a: Option<Handle>, b: Option<Handle>) -> Option<Handle> {
        match (a, b) {
            (None, tree) | (tree, None) => tree,
            (Some(x), Some(y)) => {
                if self.nodes.get(x).priority() >= self.nodes.get(y).priority() {
                    let detached = self.nodes.get(x).right();
                    let merged = self.merge(detached, Some(y));
                    self.nodes.get_mut(x).set_right(merged);
                    self.recalc(x);
                    Some(x)
                } else {
                    let detached = self.nodes.get(y).left();
                    let merged = self.merge(Some(x), detached);
                    self.nodes.get_mut(y).set_left(merged);
                    self.recalc(y);
                    Some(y)
                }
            }
        }
    }

    /// Recomputes `size` and `sum` for `handle` from its children.
    #[allow(clippy::cast_possible_wrap)]
    fn recalc(&mut self, handle: Handle) {
        let (key, count, left, right) = {
            let node = self.nodes.get(handle);
            (node.key(), node.count(), node.left(), node.right())
        };

        let size = self.subtree_size(left) + count + self.subtree_size(right);
        let sum = self.subtree_sum(left) + i128::from(key) * count as i128 + self.subtree_sum(right);
        self.nodes.get_mut(handle).set_aggregates(size, sum);
    }

    #[inline]
    fn subtree_size(&self, tree: Option<Handle>) -> usize {
        tree.map_or(0, |h| self.nodes.get(h).size())
    }

    #[inline]
    fn subtree_sum(&self, tree: Option<Handle>) -> i128 {
        tree.map_or(0, |h| self.nodes.get(h).sum())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    impl RawTreap {
        /// Walks the whole tree asserting every structural invariant:
        /// BST order, heap order on priorities, aggregate formulas, and
        /// `count >= 1`.
        fn assert_invariants(&self) {
            let _ = self.check_subtree(self.root, None, None, None);
        }

        #[allow(clippy::cast_possible_wrap)]
        fn check_subtree(
            &self,
            tree: Option<Handle>,
            lower: Option<i64>,
            upper: Option<i64>,
            parent_priority: Option<u64>,
        ) -> (usize, i128) {
            let Some(h) = tree else {
                return (0, 0);
            };

            let node = self.nodes.get(h);
            assert!(node.count() >= 1, "live node with zero count");
            if let Some(lower) = lower {
                assert!(node.key() > lower, "BST order violated on the left");
            }
            if let Some(upper) = upper {
                assert!(node.key() < upper, "BST order violated on the right");
            }
            if let Some(parent_priority) = parent_priority {
                assert!(node.priority() <= parent_priority, "heap order violated");
            }

            let (left_size, left_sum) =
                self.check_subtree(node.left(), lower, Some(node.key()), Some(node.priority()));
            let (right_size, right_sum) =
                self.check_subtree(node.right(), Some(node.key()), upper, Some(node.priority()));

            let size = left_size + node.count() + right_size;
            let sum = left_sum + i128::from(node.key()) * node.count() as i128 + right_sum;
            assert_eq!(node.size(), size, "stale size aggregate");
            assert_eq!(node.sum(), sum, "stale sum aggregate");

            (size, sum)
        }
    }

    #[test]
    fn empty_tree() {
        let treap = RawTreap::new();
        assert!(treap.is_empty());
        assert_eq!(treap.len(), 0);
        assert_eq!(treap.total(), 0);
        assert_eq!(treap.count_within_budget(100), 0);
        assert_eq!(treap.first(), None);
        assert_eq!(treap.last(), None);
    }

    #[test]
    fn duplicates_share_a_node() {
        let mut treap = RawTreap::new();
        for _ in 0..5 {
            treap.insert(7);
        }
        treap.assert_invariants();
        assert_eq!(treap.len(), 5);
        assert_eq!(treap.distinct_len(), 1);
        assert_eq!(treap.count_of(7), 5);
        assert_eq!(treap.total(), 35);
    }

    #[test]
    fn remove_frees_sole_occurrence() {
        let mut treap = RawTreap::new();
        treap.insert(3);
        treap.insert(3);
        treap.insert(9);

        assert!(treap.remove(3));
        treap.assert_invariants();
        assert_eq!(treap.count_of(3), 1);

        assert!(treap.remove(3));
        treap.assert_invariants();
        assert_eq!(treap.count_of(3), 0);
        assert_eq!(treap.distinct_len(), 1);

        assert!(!treap.remove(3));
        assert_eq!(treap.len(), 1);
    }

    #[test]
    fn extreme_keys() {
        let mut treap = RawTreap::new();
        treap.insert(i64::MIN);
        treap.insert(i64::MAX);
        treap.insert(0);
        treap.assert_invariants();
        assert_eq!(treap.first(), Some(i64::MIN));
        assert_eq!(treap.last(), Some(i64::MAX));
        assert!(treap.remove(i64::MIN));
        treap.assert_invariants();
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i64),
        Remove(i64),
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        // A narrow key range forces duplicate hits and removal of real nodes.
        prop_oneof![
            3 => (-20i64..20).prop_map(Operation::Insert),
            2 => (-20i64..20).prop_map(Operation::Remove),
        ]
    }

    proptest! {
        /// Invariants hold after every mutation of a random op sequence, and
        /// the element count tracks a plain sorted-Vec model.
        #[test]
        fn invariants_hold_under_churn(operations in prop::collection::vec(operation_strategy(), 0..400)) {
            let mut treap = RawTreap::new();
            let mut model: Vec<i64> = Vec::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key) => {
                        treap.insert(key);
                        model.push(key);
                    }
                    Operation::Remove(key) => {
                        let removed = treap.remove(key);
                        let expected = model.iter().position(|&k| k == key);
                        prop_assert_eq!(removed, expected.is_some());
                        if let Some(index) = expected {
                            model.swap_remove(index);
                        }
                    }
                }

                treap.assert_invariants();
                prop_assert_eq!(treap.len(), model.len());
                prop_assert_eq!(treap.total(), model.iter().map(|&k| i128::from(k)).sum::<i128>());
            }
        }

        /// The tree shape may differ per seed; every observable does not.
        #[test]
        fn observables_are_seed_independent(keys in prop::collection::vec(-50i64..50, 0..200), cap in 0i64..2000) {
            let mut a = RawTreap::with_seed(1);
            let mut b = RawTreap::with_seed(0xDEAD_BEEF);

            for &key in &keys {
                a.insert(key);
                b.insert(key);
            }

            prop_assert_eq!(a.len(), b.len());
            prop_assert_eq!(a.total(), b.total());
            prop_assert_eq!(a.first(), b.first());
            prop_assert_eq!(a.last(), b.last());
            prop_assert_eq!(a.count_within_budget(cap), b.count_within_budget(cap));
        }
    }
}

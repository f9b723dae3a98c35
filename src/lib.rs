//! A sum-augmented order-statistic multiset for Rust.
//!
//! This crate provides [`TreapMultiset`], an ordered multiset of `i64` keys
//! backed by a randomized balanced search tree (treap) in which every node
//! also tracks the element count and value sum of its subtree. The extra
//! aggregates enable one query the standard collections cannot answer without
//! a full scan:
//!
//! - [`count_within_budget`](TreapMultiset::count_within_budget) - How many of
//!   the smallest elements (with multiplicity) fit under a sum budget, in
//!   O(log n) expected time.
//!
//! # Example
//!
//! ```
//! use treap_multiset::TreapMultiset;
//!
//! let mut prices = TreapMultiset::new();
//! prices.insert(5);
//! prices.insert(3);
//! prices.insert(8);
//! prices.insert(3);
//!
//! // Sorted contents are [3, 3, 5, 8]; the longest prefix summing to at
//! // most 8 is [3, 3].
//! assert_eq!(prices.count_within_budget(8), 2);
//!
//! // Duplicates are first-class: they share a node but count individually.
//! assert_eq!(prices.len(), 4);
//! assert_eq!(prices.count_of(&3), 2);
//! ```
//!
//! The [`admission`] module builds on the budget query to plan evictions over
//! a streaming sequence: for each arriving value, how many of the earlier
//! values must be dropped so the running total stays under a fixed budget.
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **O(log n) expected insert/remove/query** - Treap balancing with
//!   split/merge, duplicates absorbed into per-node counts
//! - **Deterministic results** - Query answers depend only on the multiset
//!   contents, never on the randomized tree shape
//! - **Cache-friendly storage** - Nodes live in a contiguous arena and
//!   reference each other by index
//!
//! # Implementation
//!
//! The multiset is a treap (tree by key, max-heap by random priority) storing
//! one node per distinct key with a multiplicity count. Every node maintains
//! its subtree's total element count and value sum; insertion and removal are
//! expressed as three-way split and merge, recomputing the aggregates at each
//! node they touch. The budget query is a single top-down descent that either
//! commits an entire left subtree or proves the answer lies strictly inside
//! it, so it never backtracks.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod raw;

pub mod admission;
pub mod multiset;

pub use multiset::TreapMultiset;

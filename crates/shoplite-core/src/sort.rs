//! # Ordering Utility
//!
//! A comparison-based quicksort used to reorder already-fetched records
//! (orders, in practice) for alternate display order.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  quicksort_by_key(items, key, reverse)                          │
//! │                                                                 │
//! │  1. pivot = key(items[len / 2])        (middle element)         │
//! │  2. three-way partition around pivot:                           │
//! │        less | equal | greater                                   │
//! │  3. recurse on less and greater, concatenate                    │
//! │        sort(less) + equal + sort(greater)                       │
//! │  4. reverse=true: reverse the FULL ascending result             │
//! │     (whole-sequence reversal, NOT a descending comparator —     │
//! │      equal keys come out mirrored, which is observable)         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a pure, pedagogical routine for small in-memory lists. With
//! the fixed middle-element pivot, adversarial inputs can degrade toward
//! O(n²); that is an accepted limitation, not a defect to fix.

use std::cmp::Ordering;

/// Sorts a slice into a new `Vec` by a caller-supplied key extractor.
///
/// The input is never mutated; even for empty or single-element input a
/// fresh copy is returned. Equal-key runs keep their input order when
/// ascending and come out fully mirrored when `reverse` is set.
///
/// ## Example
/// ```rust
/// use shoplite_core::sort::quicksort_by_key;
///
/// let totals = vec![3, 1, 2];
/// assert_eq!(quicksort_by_key(&totals, |t| *t, false), vec![1, 2, 3]);
/// assert_eq!(quicksort_by_key(&totals, |t| *t, true), vec![3, 2, 1]);
/// ```
pub fn quicksort_by_key<T, K, F>(items: &[T], key: F, reverse: bool) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let sorted = sort_ascending(items, &key);
    if reverse {
        sorted.into_iter().rev().collect()
    } else {
        sorted
    }
}

fn sort_ascending<T, K, F>(items: &[T], key: &F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot_key = key(&items[items.len() / 2]);

    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for item in items {
        match key(item).cmp(&pivot_key) {
            Ordering::Less => less.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
            Ordering::Greater => greater.push(item.clone()),
        }
    }

    let mut sorted = sort_ascending(&less, key);
    sorted.extend(equal);
    sorted.extend(sort_ascending(&greater, key));
    sorted
}

// =============================================================================
// Unit Tests
// =============================================================================

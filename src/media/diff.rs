// SPDX-License-Identifier: MPL-2.0
//! Ordered set difference over slices.
//!
//! Used by the pager to work out which identifiers disappeared when the
//! host's visible set changes (e.g. after a deletion), without relying
//! on positional snapshot diffing.

use std::collections::HashSet;
use std::hash::Hash;

/// Extension trait computing the elements of `self` absent from `other`.
///
/// Both variants preserve `self`'s original relative order and mutate
/// neither input; they differ only in complexity and bounds.
pub trait OrderedDifference<T> {
    /// Linear-scan difference, O(n·m). Requires only `PartialEq`, which
    /// keeps it usable for element types that cannot hash. Fine for the
    /// page counts a viewer realistically handles.
    fn subtracting(&self, other: &[T]) -> Vec<T>
    where
        T: PartialEq + Clone;

    /// Hashed difference, O(n+m). Same contract as
    /// [`subtracting`](Self::subtracting) for hashable element types.
    fn subtracting_hashed(&self, other: &[T]) -> Vec<T>
    where
        T: Eq + Hash + Clone;
}

impl<T> OrderedDifference<T> for [T] {
    fn subtracting(&self, other: &[T]) -> Vec<T>
    where
        T: PartialEq + Clone,
    {
        self.iter()
            .filter(|item| !other.contains(item))
            .cloned()
            .collect()
    }

    fn subtracting_hashed(&self, other: &[T]) -> Vec<T>
    where
        T: Eq + Hash + Clone,
    {
        let absent: HashSet<&T> = other.iter().collect();
        self.iter()
            .filter(|item| !absent.contains(item))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaId;

    // Both variants must satisfy the same contract, so every case runs
    // through both.
    fn both(a: &[i32], b: &[i32]) -> (Vec<i32>, Vec<i32>) {
        (a.subtracting(b), a.subtracting_hashed(b))
    }

    #[test]
    fn subtracting_superset_is_empty() {
        let (naive, hashed) = both(&[0, 1, 2], &[0, 1, 2, 3]);
        assert_eq!(naive, Vec::<i32>::new());
        assert_eq!(hashed, Vec::<i32>::new());
    }

    #[test]
    fn subtracting_removes_only_present_elements() {
        let (naive, hashed) = both(&[0, 1, 2], &[1]);
        assert_eq!(naive, vec![0, 2]);
        assert_eq!(hashed, vec![0, 2]);
    }

    #[test]
    fn subtracting_self_is_empty() {
        let (naive, hashed) = both(&[4, 5, 6], &[4, 5, 6]);
        assert!(naive.is_empty());
        assert!(hashed.is_empty());
    }

    #[test]
    fn subtracting_empty_returns_all() {
        let (naive, hashed) = both(&[4, 5, 6], &[]);
        assert_eq!(naive, vec![4, 5, 6]);
        assert_eq!(hashed, vec![4, 5, 6]);
    }

    #[test]
    fn empty_minus_anything_is_empty() {
        let (naive, hashed) = both(&[], &[1, 2]);
        assert!(naive.is_empty());
        assert!(hashed.is_empty());
    }

    #[test]
    fn order_of_left_operand_is_preserved() {
        let (naive, hashed) = both(&[9, 3, 7, 1, 5], &[3, 1]);
        assert_eq!(naive, vec![9, 7, 5]);
        assert_eq!(hashed, vec![9, 7, 5]);
    }

    #[test]
    fn other_ordering_is_irrelevant() {
        let a = [1, 2, 3, 4];
        assert_eq!(a.subtracting(&[4, 2]), a.subtracting(&[2, 4]));
        assert_eq!(a.subtracting_hashed(&[4, 2]), a.subtracting_hashed(&[2, 4]));
    }

    #[test]
    fn duplicates_in_self_are_kept_per_occurrence() {
        let (naive, hashed) = both(&[1, 2, 1, 3, 1], &[3]);
        assert_eq!(naive, vec![1, 2, 1, 1]);
        assert_eq!(hashed, vec![1, 2, 1, 1]);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = vec![1, 2, 3];
        let b = vec![2];
        let _ = a.subtracting(&b);
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![2]);
    }

    #[test]
    fn works_over_media_ids() {
        let a = vec![MediaId::new(1_u32), MediaId::new(2_u32), MediaId::new(3_u32)];
        let b = vec![MediaId::new(2_u32)];
        let removed = a.subtracting_hashed(&b);
        assert_eq!(removed, vec![MediaId::new(1_u32), MediaId::new(3_u32)]);
    }
}

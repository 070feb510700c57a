use super::{AbstractDomain, HasBottom};
use crate::prelude::*;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

/// A set of elements ordered by inclusion, with union as the meet operation.
///
/// The empty set is the bottom element.
/// Since a `SetFact` implements the `Deref` and `DerefMut` traits with target the inner `BTreeSet`,
/// it can be used just like a `BTreeSet`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct SetFact<T: Ord + Clone> {
    inner: BTreeSet<T>,
}

impl<T: Ord + Clone> SetFact<T> {
    /// Create a new empty set.
    pub fn new() -> SetFact<T> {
        SetFact {
            inner: BTreeSet::new(),
        }
    }

    /// Add all elements of `other` to `self`.
    /// Returns `true` if `self` changed.
    pub fn union_with(&mut self, other: &SetFact<T>) -> bool {
        let old_len = self.inner.len();
        self.inner.extend(other.inner.iter().cloned());
        old_len != self.inner.len()
    }
}

impl<T: Ord + Clone> Default for SetFact<T> {
    fn default() -> Self {
        SetFact::new()
    }
}

impl<T: Ord + Clone> Deref for SetFact<T> {
    type Target = BTreeSet<T>;

    fn deref(&self) -> &BTreeSet<T> {
        &self.inner
    }
}

impl<T: Ord + Clone> DerefMut for SetFact<T> {
    fn deref_mut(&mut self) -> &mut BTreeSet<T> {
        &mut self.inner
    }
}

impl<T: Ord + Clone> FromIterator<T> for SetFact<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SetFact {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord + Clone> AbstractDomain for SetFact<T> {
    /// The union of both sets.
    fn meet(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    fn meet_with(&mut self, other: &Self) -> bool {
        self.union_with(other)
    }

    /// The universe is not known, so no set is the top element.
    fn is_top(&self) -> bool {
        false
    }

    fn is_less_or_equal(&self, other: &Self) -> bool {
        self.inner.is_subset(&other.inner)
    }
}

impl<T: Ord + Clone> HasBottom for SetFact<T> {
    fn bottom() -> Self {
        SetFact::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elements: &[u8]) -> SetFact<u8> {
        elements.iter().copied().collect()
    }

    #[test]
    fn union_as_meet() {
        let left = set(&[1, 2]);
        let right = set(&[2, 3]);
        assert_eq!(left.meet(&right), set(&[1, 2, 3]));
        assert_eq!(SetFact::bottom().meet(&right), right);
        assert!(left.is_less_or_equal(&set(&[1, 2, 5])));
        assert!(!left.is_less_or_equal(&right));

        let mut fact = left.clone();
        assert!(fact.meet_with(&right));
        assert!(!fact.meet_with(&left));
    }
}

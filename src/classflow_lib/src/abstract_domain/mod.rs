//! This module defines traits describing general properties of abstract domains
//! as well as the abstract domain types used as dataflow facts by the analyses.

use crate::prelude::*;

mod value;
pub use value::Value;

mod set_fact;
pub use set_fact::SetFact;

mod map_fact;
pub use map_fact::*;

/// The main trait describing an abstract domain.
///
/// Each abstract domain is partially ordered.
/// Abstract domains of the same type can be combined with the `meet` operation,
/// which must be commutative, associative and monotonic.
/// Equality has to be consistent with the partial order,
/// i.e. `a == b` holds if and only if `a <= b` and `b <= a` hold.
///
/// The meet operation moves upwards in the partial order:
/// The bottom element (if it exists) is the identity of `meet`
/// and the top element (if it exists) absorbs every other element.
pub trait AbstractDomain: Sized + Eq + Clone {
    /// Returns an upper bound (with respect to the partial order on the domain)
    /// for the two inputs `self` and `other`.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// Meet `self` with `other` in-place.
    /// Returns `true` if the value of `self` changed.
    ///
    /// # Default
    ///
    /// Calls [`AbstractDomain::meet`] on the inputs and overwrites `self` with
    /// the result. Does nothing when `self` is equal to `other`.
    fn meet_with(&mut self, other: &Self) -> bool {
        if self == other {
            return false;
        }
        let new_value = self.meet(other);
        if new_value == *self {
            false
        } else {
            *self = new_value;
            true
        }
    }

    /// Returns whether the element represents the top element (i.e. maximal with respect to the partial order) or not.
    /// If a domain has no maximal element, this function should always return false.
    fn is_top(&self) -> bool;

    /// Returns `true` if `self` is less than or equal to `other` in the partial order.
    fn is_less_or_equal(&self, other: &Self) -> bool {
        self.meet(other) == *other
    }
}

/// An abstract domain implementing this trait has a global minimum, i.e. a *Bottom* element.
pub trait HasBottom {
    /// Return an instance of the *Bottom* element.
    fn bottom() -> Self;
}

/// The fact of the constant propagation analyses:
/// a map from variables to their abstract values.
pub type CpFact = MapFact<crate::intermediate_representation::Variable, Value>;

use super::{AbstractDomain, HasBottom};
use crate::prelude::*;
use std::fmt::Display;

/// The flat lattice of integer constants.
///
/// `Undef` is the bottom element, meaning that no value has been observed yet.
/// `Nac` ("not a constant") is the top element, meaning that the value may be anything.
/// Distinct constants are incomparable and meet to `Nac`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum Value {
    /// No value observed yet.
    #[default]
    Undef,
    /// A known 32-bit integer constant.
    Constant(i32),
    /// Not a constant.
    Nac,
}

impl Value {
    /// Returns `true` if the value is the constant `Nac`.
    pub fn is_nac(&self) -> bool {
        matches!(self, Value::Nac)
    }

    /// Returns `true` if the value is `Undef`.
    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }

    /// Return the integer if the value is a constant.
    pub fn as_constant(&self) -> Option<i32> {
        match self {
            Value::Constant(value) => Some(*value),
            _ => None,
        }
    }
}

impl AbstractDomain for Value {
    fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
            (Value::Undef, value) | (value, Value::Undef) => *value,
            (Value::Constant(left), Value::Constant(right)) if left == right => *self,
            _ => Value::Nac,
        }
    }

    fn is_top(&self) -> bool {
        self.is_nac()
    }
}

impl HasBottom for Value {
    fn bottom() -> Self {
        Value::Undef
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undef => write!(f, "UNDEF"),
            Value::Constant(value) => write!(f, "{}", value),
            Value::Nac => write!(f, "NAC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_values() -> Vec<Value> {
        vec![
            Value::Undef,
            Value::Constant(-1),
            Value::Constant(0),
            Value::Constant(7),
            Value::Nac,
        ]
    }

    #[test]
    fn meet() {
        assert_eq!(Value::Constant(1).meet(&Value::Constant(1)), Value::Constant(1));
        assert_eq!(Value::Constant(1).meet(&Value::Constant(2)), Value::Nac);
        assert_eq!(Value::Constant(1).meet(&Value::Undef), Value::Constant(1));
        assert_eq!(Value::Undef.meet(&Value::Nac), Value::Nac);
        assert!(Value::Nac.is_top());
    }

    #[test]
    fn bottom_is_identity() {
        for value in all_values() {
            assert_eq!(Value::bottom().meet(&value), value);
            assert_eq!(value.meet(&Value::bottom()), value);
        }
    }

    #[test]
    fn lattice_laws() {
        for a in all_values() {
            for b in all_values() {
                assert_eq!(a.meet(&b), b.meet(&a));
                // equality agrees with the order
                assert_eq!(a == b, a.is_less_or_equal(&b) && b.is_less_or_equal(&a));
                for c in all_values() {
                    assert_eq!(a.meet(&b).meet(&c), a.meet(&b.meet(&c)));
                    if a.is_less_or_equal(&b) {
                        assert!(a.meet(&c).is_less_or_equal(&b.meet(&c)));
                    }
                }
            }
        }
    }

    #[test]
    fn meet_with_reports_change() {
        let mut value = Value::Undef;
        assert!(value.meet_with(&Value::Constant(3)));
        assert!(!value.meet_with(&Value::Constant(3)));
        assert!(value.meet_with(&Value::Constant(4)));
        assert_eq!(value, Value::Nac);
        assert!(!value.meet_with(&Value::Undef));
    }
}

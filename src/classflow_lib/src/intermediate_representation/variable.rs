use crate::prelude::*;
use std::fmt::Display;

/// The static type of a variable.
///
/// Only the distinction between primitive types and reference types matters to the analyses,
/// so reference types only carry the name of the referenced class.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    /// A reference to an object of the named class (or array type).
    Reference(String),
}

impl Type {
    /// Returns `true` for the primitive types whose values are represented as 32-bit integers,
    /// i.e. the types tracked by constant propagation.
    pub fn can_hold_int(&self) -> bool {
        matches!(
            self,
            Type::Byte | Type::Short | Type::Int | Type::Char | Type::Boolean
        )
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Boolean => write!(f, "boolean"),
            Type::Byte => write!(f, "byte"),
            Type::Char => write!(f, "char"),
            Type::Short => write!(f, "short"),
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Void => write!(f, "void"),
            Type::Reference(class) => write!(f, "{}", class),
        }
    }
}

/// A local variable of a method (including parameters and compiler-generated temporaries).
///
/// Variables are identified by their name, which is required to be unique inside a method.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Variable {
    /// The name of the variable.
    pub name: String,
    /// The declared type of the variable.
    pub ty: Type,
}

impl Variable {
    /// Create a new variable with the given name and type.
    pub fn new(name: impl Into<String>, ty: Type) -> Variable {
        Variable {
            name: name.into(),
            ty,
        }
    }

    /// Returns `true` if constant propagation tracks the value of the variable.
    pub fn can_hold_int(&self) -> bool {
        self.ty.can_hold_int()
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

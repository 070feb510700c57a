use super::{Stmt, Variable};
use crate::prelude::*;
use derive_more::{Display, From};
use std::fmt;

/// The part of a method signature that identifies a method inside its class,
/// e.g. `int foo(int,java.lang.String)`.
///
/// Overriding methods share the subsignature of the overridden method.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Display, From,
)]
#[serde(transparent)]
pub struct Subsignature(String);

impl Subsignature {
    /// Create a new subsignature from its textual representation.
    pub fn new(subsignature: impl Into<String>) -> Subsignature {
        Subsignature(subsignature.into())
    }

    /// The textual representation of the subsignature.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A reference to a method by its (declaring) class and subsignature.
///
/// At a call site the declaring class is the statically named class, which need not declare the method itself.
/// For resolved methods the declaring class is the class containing the method body,
/// so that a `MethodRef` uniquely identifies a method of the program.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct MethodRef {
    /// The name of the class.
    pub declaring_class: String,
    /// The subsignature of the method.
    pub subsignature: Subsignature,
}

impl MethodRef {
    /// Create a new method reference.
    pub fn new(declaring_class: impl Into<String>, subsignature: impl Into<String>) -> MethodRef {
        MethodRef {
            declaring_class: declaring_class.into(),
            subsignature: Subsignature::new(subsignature),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.declaring_class, self.subsignature)
    }
}

/// A method declared in a class, together with its body.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Method {
    /// The name of the class declaring the method.
    pub declaring_class: String,
    /// The subsignature of the method.
    pub subsignature: Subsignature,
    /// The formal parameters (excluding `this`).
    pub params: Vec<Variable>,
    /// Static methods have no receiver.
    #[serde(default)]
    pub is_static: bool,
    /// Abstract methods (including interface methods without default implementation) have no body.
    #[serde(default)]
    pub is_abstract: bool,
    /// The statements of the method.
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl Method {
    /// Return the reference uniquely identifying this method.
    pub fn get_ref(&self) -> MethodRef {
        MethodRef {
            declaring_class: self.declaring_class.clone(),
            subsignature: self.subsignature.clone(),
        }
    }

    /// Return the variables returned by the `return` statements of the method,
    /// without duplicates and in order of first occurrence.
    pub fn return_vars(&self) -> Vec<&Variable> {
        let mut vars: Vec<&Variable> = Vec::new();
        for stmt in self.body.iter() {
            if let Stmt::Return(Some(var)) = stmt {
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
        }
        vars
    }

    /// Iterate over all call sites of the method together with their statement index.
    pub fn call_sites(&self) -> impl Iterator<Item = (usize, &super::Invoke)> {
        self.body
            .iter()
            .enumerate()
            .filter_map(|(index, stmt)| stmt.as_invoke().map(|invoke| (index, invoke)))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_ref())
    }
}

#[cfg(test)]
impl Method {
    /// Create a mock method.
    /// Parameters are given in the `name:type` notation of the [`variable!`](crate::variable) macro.
    pub fn mock(class: &str, subsignature: &str, params: &[&str], body: Vec<Stmt>) -> Method {
        Method {
            declaring_class: class.to_string(),
            subsignature: Subsignature::new(subsignature),
            params: params
                .iter()
                .map(|param| super::parsing::parse_variable(param))
                .collect(),
            is_static: false,
            is_abstract: false,
            body,
        }
    }

    /// Create a mock abstract method without body.
    pub fn mock_abstract(class: &str, subsignature: &str, params: &[&str]) -> Method {
        Method {
            is_abstract: true,
            ..Method::mock(class, subsignature, params, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmts;

    #[test]
    fn return_vars_are_deduplicated() {
        let method = Method::mock(
            "A",
            "int pick(int)",
            &["p"],
            stmts![
                "if p > 0 goto 3",
                "return p",
                "goto 4",
                "return p",
                "x = 1",
                "return x"
            ],
        );
        let names: Vec<&str> = method
            .return_vars()
            .into_iter()
            .map(|var| var.name.as_str())
            .collect();
        assert_eq!(names, vec!["p", "x"]);
        assert_eq!(method.to_string(), "<A: int pick(int)>");
    }
}

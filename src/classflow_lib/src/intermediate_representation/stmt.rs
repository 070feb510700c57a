use super::{Expression, MethodRef, Variable};
use crate::prelude::*;
use std::fmt;

/// The syntactic kind of a call site.
///
/// The kind determines how the call graph builder resolves the call targets.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// A call through an interface type.
    Interface,
    /// A call of a constructor, a private method or a superclass method.
    Special,
    /// A call of a static method.
    Static,
    /// A call of an instance method through a class type.
    Virtual,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Interface => write!(f, "interface"),
            CallKind::Special => write!(f, "special"),
            CallKind::Static => write!(f, "static"),
            CallKind::Virtual => write!(f, "virtual"),
        }
    }
}

/// A method invocation, optionally assigning the returned value to a variable.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Invoke {
    /// The variable receiving the return value, if any.
    pub result: Option<Variable>,
    /// The syntactic kind of the call.
    pub kind: CallKind,
    /// The statically named target of the call.
    pub method_ref: MethodRef,
    /// The receiver object. `None` for static calls.
    pub receiver: Option<Variable>,
    /// The actual arguments (excluding the receiver).
    pub args: Vec<Variable>,
}

/// A statement of a method body.
///
/// Branch targets are indices into the statement list of the enclosing method.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub enum Stmt {
    /// An assignment of the value of `value` to the local variable `var`.
    Assign {
        /// The variable that is written to.
        var: Variable,
        /// The expression computing the assigned value.
        value: Expression,
    },
    /// A write to a field or an array element.
    /// `target` is one of the `InstanceField`, `StaticField` or `ArrayAccess` expressions.
    Store {
        /// The written memory location.
        target: Expression,
        /// The written value.
        value: Variable,
    },
    /// A method call.
    Invoke(Invoke),
    /// A conditional jump to `target`.
    /// If the condition is not satisfied, execution continues with the next statement.
    If {
        /// The condition, a relational binary operation.
        condition: Expression,
        /// The index of the jump target.
        target: usize,
    },
    /// An unconditional jump.
    Goto(usize),
    /// A jump table.
    Switch {
        /// The variable whose value selects the case.
        var: Variable,
        /// Pairs of case value and jump target.
        cases: Vec<(i32, usize)>,
        /// The jump target if no case value matches.
        default: usize,
    },
    /// A return from the method, optionally returning the value of a variable.
    Return(Option<Variable>),
    /// Throwing an exception object.
    Throw(Variable),
    /// A statement without effect.
    Nop,
}

impl Stmt {
    /// Return the local variable defined by the statement, if any.
    pub fn get_def(&self) -> Option<&Variable> {
        match self {
            Stmt::Assign { var, .. } => Some(var),
            Stmt::Invoke(invoke) => invoke.result.as_ref(),
            _ => None,
        }
    }

    /// Return all variables read by the statement.
    /// The array may contain duplicates.
    pub fn get_uses(&self) -> Vec<&Variable> {
        match self {
            Stmt::Assign { value, .. } => value.input_vars(),
            Stmt::Store { target, value } => {
                let mut vars = target.input_vars();
                vars.push(value);
                vars
            }
            Stmt::Invoke(invoke) => invoke.receiver.iter().chain(invoke.args.iter()).collect(),
            Stmt::If { condition, .. } => condition.input_vars(),
            Stmt::Switch { var, .. } | Stmt::Throw(var) => vec![var],
            Stmt::Return(var) => var.iter().collect(),
            Stmt::Goto(_) | Stmt::Nop => Vec::new(),
        }
    }

    /// Return the invocation if the statement is a call site.
    pub fn as_invoke(&self) -> Option<&Invoke> {
        match self {
            Stmt::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }

    /// Return the indices of all statements the statement may jump to explicitly.
    /// The fall-through successor is not included.
    pub fn jump_targets(&self) -> Vec<usize> {
        match self {
            Stmt::If { target, .. } | Stmt::Goto(target) => vec![*target],
            Stmt::Switch { cases, default, .. } => cases
                .iter()
                .map(|(_, target)| *target)
                .chain(std::iter::once(*default))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign { var, value } => write!(f, "{} = {}", var, value),
            Stmt::Store { target, value } => write!(f, "{} = {}", target, value),
            Stmt::Invoke(invoke) => {
                if let Some(result) = &invoke.result {
                    write!(f, "{} = ", result)?;
                }
                write!(f, "invoke{} ", invoke.kind)?;
                if let Some(receiver) = &invoke.receiver {
                    write!(f, "{}.", receiver)?;
                }
                let args: Vec<String> = invoke.args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}({})", invoke.method_ref, args.join(", "))
            }
            Stmt::If { condition, target } => write!(f, "if {} goto {}", condition, target),
            Stmt::Goto(target) => write!(f, "goto {}", target),
            Stmt::Switch {
                var,
                cases,
                default,
            } => {
                write!(f, "switch {}", var)?;
                for (value, target) in cases {
                    write!(f, " {}:{}", value, target)?;
                }
                write!(f, " default:{}", default)
            }
            Stmt::Return(Some(var)) => write!(f, "return {}", var),
            Stmt::Return(None) => write!(f, "return"),
            Stmt::Throw(var) => write!(f, "throw {}", var),
            Stmt::Nop => write!(f, "nop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::stmt;

    fn names(vars: Vec<&crate::intermediate_representation::Variable>) -> Vec<String> {
        vars.into_iter().map(|var| var.name.clone()).collect()
    }

    #[test]
    fn defs_and_uses() {
        let assign = stmt!("z = x + y");
        assert_eq!(assign.get_def().unwrap().name, "z");
        assert_eq!(names(assign.get_uses()), vec!["x", "y"]);

        let call = stmt!("r = invokevirtual o.<A: int foo(int,int)>(a, b)");
        assert_eq!(call.get_def().unwrap().name, "r");
        assert_eq!(names(call.get_uses()), vec!["o", "a", "b"]);

        let store = stmt!("o.f = v");
        assert!(store.get_def().is_none());
        assert_eq!(names(store.get_uses()), vec!["o", "v"]);

        let branch = stmt!("if a < 10 goto 4");
        assert!(branch.get_def().is_none());
        assert_eq!(names(branch.get_uses()), vec!["a"]);
        assert_eq!(branch.jump_targets(), vec![4]);
    }

    #[test]
    fn switch_targets() {
        let switch = stmt!("switch x 1:3 2:5 default:7");
        assert_eq!(switch.jump_targets(), vec![3, 5, 7]);
        assert_eq!(switch.to_string(), "switch x 1:3 2:5 default:7");
    }
}

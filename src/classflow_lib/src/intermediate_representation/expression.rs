use super::{Type, Variable};
use crate::prelude::*;
use std::fmt;

/// An expression is a calculation rule
/// on how to compute a certain value given some variables as input.
///
/// Expressions occur as right hand sides of assignments and as conditions of `If` statements.
/// Unlike in a strict three-address code operands of binary operations may be nested expressions,
/// but the IR producer usually only emits variables and integer literals as operands.
///
/// Evaluating `New`, `Cast`, field and array accesses and integer division
/// may have side effects (allocation, exceptions) at runtime.
/// See [`Expression::has_no_side_effect`].
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub enum Expression {
    /// A variable.
    Var(Variable),
    /// An integer literal.
    IntLiteral(i32),
    /// Any other literal (string, null, long, float, class literals),
    /// represented by its textual description.
    OtherLiteral(String),
    /// A binary operation.
    BinOp {
        /// The opcode/type of the operation
        op: BinOpType,
        /// The left hand side expression
        lhs: Box<Expression>,
        /// The right hand side expression
        rhs: Box<Expression>,
    },
    /// Arithmetic negation.
    Neg(Box<Expression>),
    /// Allocation of a new object of the given class.
    New(String),
    /// A checked reference cast.
    Cast {
        /// The target type of the cast
        ty: Type,
        /// The value being cast
        arg: Variable,
    },
    /// A read of an instance field.
    InstanceField {
        /// The object whose field is read
        base: Variable,
        /// The name of the field
        field: String,
    },
    /// A read of a static field.
    StaticField {
        /// The class declaring the field
        class: String,
        /// The name of the field
        field: String,
    },
    /// A read of an array element.
    ArrayAccess {
        /// The array
        base: Variable,
        /// The index of the element
        index: Variable,
    },
    /// The length of an array.
    ArrayLength(Variable),
}

/// The operator of a binary operation.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum BinOpType {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Ushr,
    And,
    Or,
    Xor,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOpType {
    /// Returns `true` for operators that may throw on a zero divisor.
    pub fn is_division(&self) -> bool {
        matches!(self, BinOpType::Div | BinOpType::Rem)
    }

    /// Returns `true` for the relational operators, whose result is `1` or `0`.
    pub fn is_condition(&self) -> bool {
        use BinOpType::*;
        matches!(self, Eq | Ne | Lt | Gt | Le | Ge)
    }

    /// Compute the result of the operation on concrete 32-bit integer values.
    ///
    /// Arithmetic wraps on overflow and shift distances are masked to 5 bits.
    /// Returns `None` for a division or remainder by zero.
    pub fn apply(&self, lhs: i32, rhs: i32) -> Option<i32> {
        use BinOpType::*;
        if self.is_division() && rhs == 0 {
            return None;
        }
        let result = match self {
            Add => lhs.wrapping_add(rhs),
            Sub => lhs.wrapping_sub(rhs),
            Mul => lhs.wrapping_mul(rhs),
            Div => lhs.wrapping_div(rhs),
            Rem => lhs.wrapping_rem(rhs),
            Shl => lhs.wrapping_shl(rhs as u32),
            Shr => lhs.wrapping_shr(rhs as u32),
            Ushr => ((lhs as u32).wrapping_shr(rhs as u32)) as i32,
            And => lhs & rhs,
            Or => lhs | rhs,
            Xor => lhs ^ rhs,
            Eq => (lhs == rhs) as i32,
            Ne => (lhs != rhs) as i32,
            Lt => (lhs < rhs) as i32,
            Gt => (lhs > rhs) as i32,
            Le => (lhs <= rhs) as i32,
            Ge => (lhs >= rhs) as i32,
        };
        Some(result)
    }
}

impl Expression {
    /// Shorthand for building a binary operation.
    pub fn bin_op(op: BinOpType, lhs: Expression, rhs: Expression) -> Expression {
        Expression::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Return an array of all input variables of the given expression.
    /// The array may contain duplicates.
    pub fn input_vars(&self) -> Vec<&Variable> {
        use Expression::*;
        match self {
            Var(var) | Cast { arg: var, .. } | ArrayLength(var) => vec![var],
            IntLiteral(_) | OtherLiteral(_) | New(_) | StaticField { .. } => Vec::new(),
            BinOp { lhs, rhs, .. } => {
                let mut vars = lhs.input_vars();
                vars.append(&mut rhs.input_vars());
                vars
            }
            Neg(arg) => arg.input_vars(),
            InstanceField { base, .. } => vec![base],
            ArrayAccess { base, index } => vec![base, index],
        }
    }

    /// Returns `true` if evaluating the expression can neither modify the heap
    /// nor raise an exception.
    ///
    /// Allocations, casts, field reads, array element reads and integer division or remainder
    /// count as side effects. Array lengths do not.
    pub fn has_no_side_effect(&self) -> bool {
        use Expression::*;
        match self {
            New(_) | Cast { .. } | InstanceField { .. } | StaticField { .. } | ArrayAccess { .. } => {
                false
            }
            BinOp { op, lhs, rhs } => {
                !op.is_division() && lhs.has_no_side_effect() && rhs.has_no_side_effect()
            }
            Neg(arg) => arg.has_no_side_effect(),
            Var(_) | IntLiteral(_) | OtherLiteral(_) | ArrayLength(_) => true,
        }
    }
}

impl fmt::Display for BinOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinOpType::*;
        let symbol = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            Shl => "<<",
            Shr => ">>",
            Ushr => ">>>",
            And => "&",
            Or => "|",
            Xor => "^",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Var(var) => write!(f, "{}", var),
            Expression::IntLiteral(value) => write!(f, "{}", value),
            Expression::OtherLiteral(text) => write!(f, "{}", text),
            Expression::BinOp { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expression::Neg(arg) => write!(f, "-{}", arg),
            Expression::New(class) => write!(f, "new {}", class),
            Expression::Cast { ty, arg } => write!(f, "({}) {}", ty, arg),
            Expression::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            Expression::StaticField { class, field } => write!(f, "{}.{}", class, field),
            Expression::ArrayAccess { base, index } => write!(f, "{}[{}]", base, index),
            Expression::ArrayLength(base) => write!(f, "{}.length", base),
        }
    }
}

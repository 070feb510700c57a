//! This module implements macros for an intuitive and condensed construction of intermediate representation elements.
//! [variable!] creates a Variable, [expr!] creates an Expression, [stmt!] and [stmts!]
//! create `Stmt` and `Vec<Stmt>`.

/// Creates a `Variable` specified by the string slice of form `name` or `name:type`.
///
/// Variables without explicit type have type `int`.
/// Types other than the primitive types are parsed as reference types.
///
/// ## Example
/// ```rust
///     use classflow_lib::intermediate_representation::*;
///     use classflow_lib::variable;
///
///     assert_eq!(variable!("x"), Variable::new("x", Type::Int));
///     assert_eq!(variable!("o:A"), Variable::new("o", Type::Reference("A".into())));
/// ```
#[macro_export]
macro_rules! variable {
    (  $x:expr  ) => {
        $crate::intermediate_representation::parsing::parse_variable($x)
    };
}

/// Creates an `Expression` specified by the string slice.
///
/// Supported are variables (see [variable!]), integer literals, binary operations with spaces around the operator,
/// negations `-x`, allocations `new A`, casts `(A) x`, field reads `x.f` and `A.f`,
/// array reads `x[i]` and array lengths `x.length`.
/// Nesting is not supported.
/// A field read on a base starting with an uppercase letter is a static field read.
/// ## Panics
///- if the string slice matches none of the supported forms.
///
/// ## Example
/// ```rust
///     use classflow_lib::intermediate_representation::*;
///     use classflow_lib::expr;
///
///     assert_eq!(expr!("42"), Expression::IntLiteral(42));
///     assert_eq!(
///         expr!("x + 1"),
///         Expression::bin_op(
///             BinOpType::Add,
///             Expression::Var(Variable::new("x", Type::Int)),
///             Expression::IntLiteral(1)
///         )
///     );
/// ```
#[macro_export]
macro_rules! expr {
    (  $x:expr  ) => {
        $crate::intermediate_representation::parsing::parse_expr($x)
    };
}

/// Creates a `Stmt` specified by the string slice. Utilizes the `variable!` and `expr!` macros and their constraints.
///
/// ## Syntax
/// Assign: `var = expr`.
///
/// Store: `x.f = v`, `A.f = v` or `x[i] = v`.
///
/// Invoke: `[var = ]invokeKIND [receiver.]<Class: subsignature>(arg, ...)` with `KIND` one of
/// `virtual`, `interface`, `special` or `static`.
///
/// Control flow: `if expr goto n`, `goto n`, `switch var c1:n1 c2:n2 default:n`, `return [var]`, `throw var` and `nop`.
/// ## Example
/// ```rust
///     use classflow_lib::intermediate_representation::*;
///     use classflow_lib::stmt;
///
///     assert_eq!(stmt!("goto 3"), Stmt::Goto(3));
///     assert_eq!(stmt!("r = invokestatic <A: int id(int)>(x)").to_string(), "r = invokestatic <A: int id(int)>(x)");
/// ```
#[macro_export]
macro_rules! stmt {
    ($x:expr) => {
        $crate::intermediate_representation::parsing::parse_stmt($x)
    };
}

/// Creates a `Vec<Stmt>` specified by the string slices. Utilizes the [stmt!] macro and its constraints.
///
/// The index of a statement in the vector is its position in the list,
/// which is the index that branch targets refer to.
/// ## Example
/// ```rust
///     use classflow_lib::intermediate_representation::*;
///     use classflow_lib::stmts;
///
///     let body = stmts!["x = 1", "if x > 0 goto 3", "x = 2", "return x"];
///     assert_eq!(body.len(), 4);
/// ```
#[macro_export]
macro_rules! stmts {
    [$($x:expr),* $(,)?] => {
        vec![$($crate::intermediate_representation::parsing::parse_stmt($x)),*]
    };
}

pub mod parsing {
    //! Provides parsing functions for the macros defined in this module.
    //! This module hides the parsing functions and allows exposure of the macros only.
    use crate::intermediate_representation::{
        BinOpType, CallKind, Expression, Invoke, MethodRef, Stmt, Type, Variable,
    };
    use regex::{Regex, RegexSet};

    const VARIABLE: &str = r"^([A-Za-z_$][\w$]*)(?::([\w.$\[\]]+))?$";

    /// Parses a type name. Unknown names are reference types.
    pub fn parse_type<S: AsRef<str>>(str: S) -> Type {
        match str.as_ref() {
            "boolean" => Type::Boolean,
            "byte" => Type::Byte,
            "char" => Type::Char,
            "short" => Type::Short,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            "void" => Type::Void,
            class => Type::Reference(class.to_string()),
        }
    }

    /// Parses a Variable defining string slice and returns its corresponding Variable.
    ///
    /// This is used for the `variable!` macro, consider the macro documentation for more details.
    pub fn parse_variable<S: AsRef<str>>(str: S) -> Variable {
        let regex = Regex::new(VARIABLE).unwrap();
        let captures = match regex.captures(str.as_ref().trim()) {
            Some(captures) => captures,
            None => panic!("Could not parse variable: {}", str.as_ref()),
        };
        let ty = captures
            .get(2)
            .map(|ty| parse_type(ty.as_str()))
            .unwrap_or(Type::Int);
        Variable::new(&captures[1], ty)
    }

    fn parse_bin_op_type(symbol: &str) -> BinOpType {
        use BinOpType::*;
        match symbol {
            "+" => Add,
            "-" => Sub,
            "*" => Mul,
            "/" => Div,
            "%" => Rem,
            "<<" => Shl,
            ">>" => Shr,
            ">>>" => Ushr,
            "&" => And,
            "|" => Or,
            "^" => Xor,
            "==" => Eq,
            "!=" => Ne,
            "<" => Lt,
            ">" => Gt,
            "<=" => Le,
            ">=" => Ge,
            _ => panic!("Unknown binary operator {}", symbol),
        }
    }

    /// Parses an Expression defining string slice and returns its corresponding Expression.
    ///
    /// This is used for the `expr!` macro, consider the macro documentation for more details.
    pub fn parse_expr<S: AsRef<str>>(str: S) -> Expression {
        let str = str.as_ref().trim();
        let patterns = [
            r"^-?[0-9]+$",                                                   // IntLiteral
            r#"^(".*"|null|-?[0-9]+L|-?[0-9]+\.[0-9]+[fF]?)$"#,              // OtherLiteral
            r"^new (\S+)$",                                                  // New
            r"^\((\S+)\) (\S+)$",                                            // Cast
            r"^(\S+)\.length$",                                              // ArrayLength
            r"^(\S+)\[(\S+)\]$",                                             // ArrayAccess
            r"^(\S+) (\+|-|\*|/|%|<<|>>>|>>|&|\||\^|==|!=|<=|>=|<|>) (\S+)$", // BinOp
            r"^-(\S+)$",                                                     // Neg
            r"^(\S+)\.([\w$]+)$",                                            // Field
            VARIABLE,
        ];
        let set = RegexSet::new(patterns).unwrap();
        // The patterns are ordered by priority.
        let index = match set.matches(str).iter().next() {
            Some(index) => index,
            None => panic!("Could not parse expression: {}", str),
        };
        let captures = Regex::new(patterns[index]).unwrap().captures(str).unwrap();
        match index {
            0 => Expression::IntLiteral(str.parse().unwrap()),
            1 => Expression::OtherLiteral(str.to_string()),
            2 => Expression::New(captures[1].to_string()),
            3 => Expression::Cast {
                ty: parse_type(&captures[1]),
                arg: parse_variable(&captures[2]),
            },
            4 => Expression::ArrayLength(parse_variable(&captures[1])),
            5 => Expression::ArrayAccess {
                base: parse_variable(&captures[1]),
                index: parse_variable(&captures[2]),
            },
            6 => Expression::bin_op(
                parse_bin_op_type(&captures[2]),
                parse_expr(&captures[1]),
                parse_expr(&captures[3]),
            ),
            7 => Expression::Neg(Box::new(parse_expr(&captures[1]))),
            8 => {
                let base = &captures[1];
                let field = captures[2].to_string();
                if base.starts_with(char::is_uppercase) || !Regex::new(VARIABLE).unwrap().is_match(base)
                {
                    Expression::StaticField {
                        class: base.to_string(),
                        field,
                    }
                } else {
                    Expression::InstanceField {
                        base: parse_variable(base),
                        field,
                    }
                }
            }
            9 => Expression::Var(parse_variable(str)),
            _ => panic!(),
        }
    }

    fn parse_call_kind(kind: &str) -> CallKind {
        match kind {
            "virtual" => CallKind::Virtual,
            "interface" => CallKind::Interface,
            "special" => CallKind::Special,
            "static" => CallKind::Static,
            _ => panic!("Unknown call kind {}", kind),
        }
    }

    /// Parses a `Stmt` defining string slice and returns its corresponding `Stmt`.
    ///
    /// This is used for the `stmt!` and `stmts!` macro, consider the macro documentation for more details.
    pub fn parse_stmt<S: AsRef<str>>(str: S) -> Stmt {
        let str = str.as_ref().trim();
        let patterns = [
            r"^nop$",                              // Nop
            r"^return(?: (\S+))?$",                // Return
            r"^goto ([0-9]+)$",                    // Goto
            r"^if (.+) goto ([0-9]+)$",            // If
            r"^switch (\S+)((?: -?[0-9]+:[0-9]+)*) default:([0-9]+)$", // Switch
            r"^throw (\S+)$",                      // Throw
            r"^(?:(\S+) = )?invoke(virtual|interface|special|static) (?:(\S+)\.)?<([^:>]+): (.+)>\(([^()]*)\)$", // Invoke
            r"^(\S+) = (.+)$",                     // Assign or Store
        ];
        let set = RegexSet::new(patterns).unwrap();
        let index = match set.matches(str).iter().next() {
            Some(index) => index,
            None => panic!("Could not parse statement: {}", str),
        };
        let captures = Regex::new(patterns[index]).unwrap().captures(str).unwrap();
        match index {
            0 => Stmt::Nop,
            1 => Stmt::Return(captures.get(1).map(|var| parse_variable(var.as_str()))),
            2 => Stmt::Goto(captures[1].parse().unwrap()),
            3 => Stmt::If {
                condition: parse_expr(&captures[1]),
                target: captures[2].parse().unwrap(),
            },
            4 => Stmt::Switch {
                var: parse_variable(&captures[1]),
                cases: captures[2]
                    .split_whitespace()
                    .map(|case| {
                        let (value, target) = case.split_once(':').unwrap();
                        (value.parse().unwrap(), target.parse().unwrap())
                    })
                    .collect(),
                default: captures[3].parse().unwrap(),
            },
            5 => Stmt::Throw(parse_variable(&captures[1])),
            6 => Stmt::Invoke(Invoke {
                result: captures.get(1).map(|var| parse_variable(var.as_str())),
                kind: parse_call_kind(&captures[2]),
                method_ref: MethodRef::new(captures[4].trim(), captures[5].trim()),
                receiver: captures.get(3).map(|var| parse_variable(var.as_str())),
                args: captures[6]
                    .split(',')
                    .map(|arg| arg.trim())
                    .filter(|arg| !arg.is_empty())
                    .map(parse_variable)
                    .collect(),
            }),
            7 => {
                let (lhs, rhs) = (&captures[1], &captures[2]);
                if Regex::new(VARIABLE).unwrap().is_match(lhs) {
                    Stmt::Assign {
                        var: parse_variable(lhs),
                        value: parse_expr(rhs),
                    }
                } else {
                    Stmt::Store {
                        target: parse_expr(lhs),
                        value: parse_variable(rhs),
                    }
                }
            }
            _ => panic!(),
        }
    }
}

#[cfg(test)]
mod tests;

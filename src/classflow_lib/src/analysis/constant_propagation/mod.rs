//! Intraprocedural constant propagation.
//!
//! The analysis tracks for each variable that can hold an integer
//! whether it holds the same constant value on all paths reaching a program point.
//! It is a forward analysis over maps from variables to [`Value`]s.
//!
//! Parameters are unknown at the start of a method, so they are `Nac` in the boundary fact.
//! Return values of calls are also `Nac`,
//! see the [interprocedural variant](crate::analysis::interprocedural::constant_propagation)
//! for an analysis that tracks constants across calls.

use super::cfg::{Cfg, CfgNode};
use super::dataflow::{DataflowAnalysis, DataflowResult, Solver, SolverKind};
use crate::abstract_domain::{CpFact, Value};
use crate::intermediate_representation::*;

/// The intraprocedural constant propagation analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantPropagation;

impl DataflowAnalysis for ConstantPropagation {
    type Fact = CpFact;

    fn is_forward(&self) -> bool {
        true
    }

    fn new_boundary_fact(&self, cfg: &Cfg) -> CpFact {
        new_boundary_fact(cfg.method())
    }

    fn new_initial_fact(&self) -> CpFact {
        CpFact::new()
    }

    fn transfer_node(&self, node: &CfgNode, in_fact: &CpFact, out_fact: &mut CpFact) -> bool {
        let new_out_fact = match node.get_stmt() {
            Some(stmt) => transfer_stmt(stmt, in_fact),
            None => in_fact.clone(),
        };
        out_fact.copy_from(&new_out_fact)
    }
}

/// The fact at the start of the method: all parameters that can hold integers are `Nac`.
pub fn new_boundary_fact(method: &Method) -> CpFact {
    method
        .params
        .iter()
        .filter(|param| param.can_hold_int())
        .map(|param| (param.clone(), Value::Nac))
        .collect()
}

/// Compute the fact after the statement from the fact before it.
///
/// Definitions of variables that can hold integers get the value of the evaluated right hand side,
/// where call results are always `Nac`.
/// All other statements do not change the fact.
pub fn transfer_stmt(stmt: &Stmt, in_fact: &CpFact) -> CpFact {
    let mut out_fact = in_fact.clone();
    match stmt {
        Stmt::Assign { var, value } if var.can_hold_int() => {
            out_fact.update(var.clone(), evaluate(value, in_fact));
        }
        Stmt::Invoke(Invoke {
            result: Some(var), ..
        }) if var.can_hold_int() => {
            out_fact.update(var.clone(), Value::Nac);
        }
        _ => (),
    }
    out_fact
}

/// Evaluate an expression under the given fact.
///
/// Integer literals evaluate to constants and variables to their value in the fact.
/// Binary operations are evaluated on the values of their operands:
/// * Division or remainder by the constant zero yields `Undef`.
/// * If both operands are constants, the result is the constant computed by the operation.
///   Conditions yield `1` if they hold and `0` otherwise.
/// * Else if one of the operands is `Nac`, the result is `Nac`.
/// * Else the result is `Undef`.
///
/// All other expressions are `Nac`.
pub fn evaluate(expression: &Expression, fact: &CpFact) -> Value {
    match expression {
        Expression::IntLiteral(value) => Value::Constant(*value),
        Expression::Var(var) => fact.get(var),
        Expression::BinOp { op, lhs, rhs } => {
            let lhs = evaluate(lhs, fact);
            let rhs = evaluate(rhs, fact);
            if op.is_division() && rhs == Value::Constant(0) {
                return Value::Undef;
            }
            match (lhs, rhs) {
                (Value::Constant(lhs), Value::Constant(rhs)) => op
                    .apply(lhs, rhs)
                    .map(Value::Constant)
                    .unwrap_or(Value::Undef),
                (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
                _ => Value::Undef,
            }
        }
        Expression::Neg(_)
        | Expression::OtherLiteral(_)
        | Expression::New(_)
        | Expression::Cast { .. }
        | Expression::InstanceField { .. }
        | Expression::StaticField { .. }
        | Expression::ArrayAccess { .. }
        | Expression::ArrayLength(_) => Value::Nac,
    }
}

/// Compute the constants of all nodes of the given control flow graph.
pub fn compute_constants(cfg: &Cfg, kind: SolverKind) -> DataflowResult<CpFact> {
    Solver::new(ConstantPropagation, kind).solve(cfg)
}

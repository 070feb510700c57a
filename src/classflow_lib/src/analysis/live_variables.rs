//! Live variable analysis.
//!
//! A variable is live at a program point
//! if its current value may be read on some path starting at that point
//! before the variable gets overwritten.
//! The analysis is a backward analysis over sets of variables with union as the meet operation.

use super::cfg::{Cfg, CfgNode};
use super::dataflow::{DataflowAnalysis, DataflowResult, Solver, SolverKind};
use crate::abstract_domain::SetFact;
use crate::intermediate_representation::Variable;

/// The live variable analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveVariableAnalysis;

impl DataflowAnalysis for LiveVariableAnalysis {
    type Fact = SetFact<Variable>;

    fn is_forward(&self) -> bool {
        false
    }

    /// No variable is live at the exit of a method.
    fn new_boundary_fact(&self, _cfg: &Cfg) -> SetFact<Variable> {
        SetFact::new()
    }

    fn new_initial_fact(&self) -> SetFact<Variable> {
        SetFact::new()
    }

    /// `IN = (OUT - {defined variable}) ∪ {used variables}`
    fn transfer_node(
        &self,
        node: &CfgNode,
        out_fact: &SetFact<Variable>,
        in_fact: &mut SetFact<Variable>,
    ) -> bool {
        let mut new_in_fact = out_fact.clone();
        if let Some(stmt) = node.get_stmt() {
            if let Some(def) = stmt.get_def() {
                new_in_fact.remove(def);
            }
            for var in stmt.get_uses() {
                new_in_fact.insert(var.clone());
            }
        }
        if new_in_fact == *in_fact {
            false
        } else {
            *in_fact = new_in_fact;
            true
        }
    }
}

/// Compute the live variables of all nodes of the given control flow graph.
pub fn compute_live_variables(cfg: &Cfg, kind: SolverKind) -> DataflowResult<SetFact<Variable>> {
    Solver::new(LiveVariableAnalysis, kind).solve(cfg)
}

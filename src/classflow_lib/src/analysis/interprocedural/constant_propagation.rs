//! Interprocedural constant propagation.
//!
//! Extends the [intraprocedural constant propagation](crate::analysis::constant_propagation)
//! by passing the values of arguments into callees and returned values back to the callers.
//! The facts of all calling contexts of a method are merged.

use super::*;
use crate::abstract_domain::{CpFact, Value};
use crate::analysis::callgraph::CallGraph;
use crate::analysis::constant_propagation::{new_boundary_fact, transfer_stmt};
use crate::analysis::dataflow::DataflowResult;
use crate::analysis::icfg::Icfg;

/// The interprocedural constant propagation analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterConstantPropagation;

impl InterDataflowAnalysis for InterConstantPropagation {
    type Fact = CpFact;

    fn new_boundary_fact(&self, cfg: &Cfg) -> CpFact {
        new_boundary_fact(cfg.method())
    }

    fn new_initial_fact(&self) -> CpFact {
        CpFact::new()
    }

    /// The effect of a call is modeled by the call, return and call-to-return edges.
    fn transfer_call_node(&self, _node: &IcfgNode, in_fact: &CpFact, out_fact: &mut CpFact) -> bool {
        out_fact.copy_from(in_fact)
    }

    fn transfer_non_call_node(
        &self,
        node: &IcfgNode,
        in_fact: &CpFact,
        out_fact: &mut CpFact,
    ) -> bool {
        let new_out_fact = match node.node.get_stmt() {
            Some(stmt) => transfer_stmt(stmt, in_fact),
            None => in_fact.clone(),
        };
        out_fact.copy_from(&new_out_fact)
    }

    /// The result variable is defined by the return edges.
    fn transfer_call_to_return_edge(&self, invoke: &Invoke, out_fact: &CpFact) -> CpFact {
        let mut fact = out_fact.clone();
        if let Some(result) = &invoke.result {
            fact.remove(result);
        }
        fact
    }

    fn transfer_call_edge(&self, invoke: &Invoke, callee: &Method, call_site_out: &CpFact) -> CpFact {
        invoke
            .args
            .iter()
            .zip(callee.params.iter())
            .filter(|(_, param)| param.can_hold_int())
            .map(|(arg, param)| (param.clone(), call_site_out.get(arg)))
            .collect()
    }

    fn transfer_return_edge(
        &self,
        invoke: &Invoke,
        return_vars: &[&Variable],
        callee_exit_out: &CpFact,
    ) -> CpFact {
        let mut fact = CpFact::new();
        if let Some(result) = invoke.result.as_ref().filter(|result| result.can_hold_int()) {
            let value = return_vars
                .iter()
                .map(|var| callee_exit_out.get(var))
                .fold(Value::Undef, |acc, value| acc.meet(&value));
            fact.update(result.clone(), value);
        }
        fact
    }
}

/// Compute the constants of all nodes of the ICFG of the given call graph.
///
/// Returns the ICFG together with the analysis result, whose facts are indexed by the ICFG nodes.
pub fn compute_inter_constants<'a>(call_graph: &CallGraph<'a>) -> (Icfg<'a>, DataflowResult<CpFact>) {
    let icfg = Icfg::new(call_graph);
    let result = InterSolver::new(InterConstantPropagation).solve(&icfg);
    (icfg, result)
}

//! Generic forward interprocedural dataflow analysis over the [ICFG](crate::analysis::icfg::Icfg).
//!
//! Compared to an [intraprocedural analysis](crate::analysis::dataflow::DataflowAnalysis)
//! facts are not only transformed at the nodes but also along the edges of the graph,
//! which lets an analysis map facts between the scopes of caller and callee:
//! * Along [`Call`](IcfgEdge::Call) edges the actual arguments are bound to the formal parameters.
//! * Along [`Return`](IcfgEdge::Return) edges the returned values are bound to the result variable of the call.
//! * Along [`CallToReturn`](IcfgEdge::CallToReturn) edges the caller's local facts bypass the call,
//! except for the result variable of the call, which gets its value from the return edges.

use crate::abstract_domain::AbstractDomain;
use crate::intermediate_representation::*;

use super::cfg::{Cfg, CfgEdge};
use super::icfg::{IcfgEdge, IcfgNode};

pub mod constant_propagation;
mod solver;
pub use solver::*;

/// The trait describing a forward interprocedural dataflow analysis.
pub trait InterDataflowAnalysis {
    /// The type of the facts computed by the analysis.
    type Fact: AbstractDomain;

    /// Return the fact at the entry of an entry method of the program.
    fn new_boundary_fact(&self, cfg: &Cfg) -> Self::Fact;

    /// Return the initial fact for all other nodes, usually the bottom element.
    fn new_initial_fact(&self) -> Self::Fact;

    /// Meet `fact` into `target`.
    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact) {
        target.meet_with(fact);
    }

    /// Transfer function for call sites.
    /// Returns `true` if `out_fact` changed.
    fn transfer_call_node(
        &self,
        node: &IcfgNode,
        in_fact: &Self::Fact,
        out_fact: &mut Self::Fact,
    ) -> bool;

    /// Transfer function for all other nodes.
    /// Returns `true` if `out_fact` changed.
    fn transfer_non_call_node(
        &self,
        node: &IcfgNode,
        in_fact: &Self::Fact,
        out_fact: &mut Self::Fact,
    ) -> bool;

    /// Transfer function for intraprocedural edges not leaving a call site.
    fn transfer_normal_edge(&self, _kind: CfgEdge, out_fact: &Self::Fact) -> Self::Fact {
        out_fact.clone()
    }

    /// Transfer function for intraprocedural edges leaving a call site.
    fn transfer_call_to_return_edge(&self, invoke: &Invoke, out_fact: &Self::Fact) -> Self::Fact;

    /// Transfer function for edges from a call site to the entry of a callee.
    fn transfer_call_edge(&self, invoke: &Invoke, callee: &Method, call_site_out: &Self::Fact) -> Self::Fact;

    /// Transfer function for edges from the exit of a callee back to the caller.
    fn transfer_return_edge(
        &self,
        invoke: &Invoke,
        return_vars: &[&Variable],
        callee_exit_out: &Self::Fact,
    ) -> Self::Fact;

    /// Transfer the OUT fact of the source of an edge along the edge.
    fn transfer_edge(&self, edge: &IcfgEdge, out_fact: &Self::Fact) -> Self::Fact {
        match edge {
            IcfgEdge::Normal(kind) => self.transfer_normal_edge(*kind, out_fact),
            IcfgEdge::CallToReturn { invoke, .. } => {
                self.transfer_call_to_return_edge(invoke, out_fact)
            }
            IcfgEdge::Call { invoke, callee } => self.transfer_call_edge(invoke, callee, out_fact),
            IcfgEdge::Return {
                invoke,
                return_vars,
                ..
            } => self.transfer_return_edge(invoke, return_vars, out_fact),
        }
    }
}

//! Generic intraprocedural dataflow analysis.
//!
//! A dataflow analysis assigns to each node of a control flow graph an IN fact
//! (the fact before execution of the node) and an OUT fact (the fact after execution of the node).
//! Facts are elements of an [abstract domain](crate::abstract_domain::AbstractDomain).
//!
//! To define an analysis, implement the [`DataflowAnalysis`] trait.
//! The analysis then gets solved over the control flow graph of a method by a [`Solver`],
//! which returns a [`DataflowResult`] containing the facts for every node.
//!
//! # Direction
//!
//! For forward analyses the boundary fact is installed at OUT of the entry node
//! and the IN fact of a node is the meet of the OUT facts of all its predecessors.
//! For backward analyses the boundary fact is installed at IN of the exit node
//! and the OUT fact of a node is the meet of the IN facts of all its successors.
//! The transfer function computes OUT from IN for forward analyses and IN from OUT for backward analyses.

use crate::abstract_domain::AbstractDomain;
use fnv::FnvHashMap;
use petgraph::graph::NodeIndex;

use super::cfg::{Cfg, CfgNode};

mod solver;
pub use solver::*;
mod worklist;
pub use worklist::Worklist;

/// The trait describing an intraprocedural dataflow analysis.
pub trait DataflowAnalysis {
    /// The type of the facts computed by the analysis.
    type Fact: AbstractDomain;

    /// Returns `true` for forward analyses and `false` for backward analyses.
    fn is_forward(&self) -> bool;

    /// Return the fact installed at the boundary of the given control flow graph,
    /// i.e. at OUT of the entry node (forward) or IN of the exit node (backward).
    fn new_boundary_fact(&self, cfg: &Cfg) -> Self::Fact;

    /// Return the initial fact for all other positions, usually the bottom element.
    fn new_initial_fact(&self) -> Self::Fact;

    /// Meet `fact` into `target`.
    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact) {
        target.meet_with(fact);
    }

    /// Compute the fact on the other side of `node` from `input` and store it in `output`.
    /// Returns `true` if `output` changed.
    ///
    /// Implementations must compute the new fact completely before comparing it to the old value of `output`.
    fn transfer_node(&self, node: &CfgNode, input: &Self::Fact, output: &mut Self::Fact) -> bool;
}

/// The result of a dataflow analysis: the IN and OUT facts of every node of a control flow graph.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataflowResult<F> {
    in_facts: FnvHashMap<NodeIndex, F>,
    out_facts: FnvHashMap<NodeIndex, F>,
}

impl<F> DataflowResult<F> {
    /// Create an empty result.
    pub fn new() -> Self {
        DataflowResult {
            in_facts: FnvHashMap::default(),
            out_facts: FnvHashMap::default(),
        }
    }

    /// Get the IN fact of a node.
    pub fn get_in_fact(&self, node: NodeIndex) -> Option<&F> {
        self.in_facts.get(&node)
    }

    /// Get the OUT fact of a node.
    pub fn get_out_fact(&self, node: NodeIndex) -> Option<&F> {
        self.out_facts.get(&node)
    }

    /// Set the IN fact of a node.
    pub fn set_in_fact(&mut self, node: NodeIndex, fact: F) {
        self.in_facts.insert(node, fact);
    }

    /// Set the OUT fact of a node.
    pub fn set_out_fact(&mut self, node: NodeIndex, fact: F) {
        self.out_facts.insert(node, fact);
    }

    /// Get mutable references to the maps of IN and OUT facts.
    fn facts_mut(
        &mut self,
    ) -> (
        &mut FnvHashMap<NodeIndex, F>,
        &mut FnvHashMap<NodeIndex, F>,
    ) {
        (&mut self.in_facts, &mut self.out_facts)
    }
}

impl<F> Default for DataflowResult<F> {
    fn default() -> Self {
        DataflowResult::new()
    }
}

#[cfg(test)]
mod tests;

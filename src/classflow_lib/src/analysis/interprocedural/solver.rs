use super::*;
use crate::analysis::dataflow::{DataflowResult, Worklist};
use crate::analysis::icfg::Icfg;
use fnv::FnvHashMap;
use petgraph::graph::NodeIndex;

/// Computes the fixpoint of an interprocedural analysis over an ICFG.
///
/// All nodes of all methods share one priority worklist.
/// The boundary fact of each entry method is met into the IN fact of its entry node on every visit,
/// so that it is kept when the entry method is also called from inside the program.
pub struct InterSolver<A: InterDataflowAnalysis> {
    analysis: A,
}

impl<A: InterDataflowAnalysis> InterSolver<A> {
    /// Create a new solver for the given analysis.
    pub fn new(analysis: A) -> InterSolver<A> {
        InterSolver { analysis }
    }

    /// Solve the analysis on the given ICFG.
    /// The returned facts are indexed by the node indices of the ICFG.
    pub fn solve(&self, icfg: &Icfg) -> DataflowResult<A::Fact> {
        let mut in_facts: FnvHashMap<NodeIndex, A::Fact> = FnvHashMap::default();
        let mut out_facts: FnvHashMap<NodeIndex, A::Fact> = FnvHashMap::default();
        for node in icfg.nodes() {
            in_facts.insert(node, self.analysis.new_initial_fact());
            out_facts.insert(node, self.analysis.new_initial_fact());
        }
        let mut boundary_facts: FnvHashMap<NodeIndex, A::Fact> = FnvHashMap::default();
        for method in icfg.entry_methods() {
            let method_ref = method.get_ref();
            if let (Some(entry), Some(cfg)) =
                (icfg.get_entry_of(&method_ref), icfg.get_cfg_of(&method_ref))
            {
                let boundary = self.analysis.new_boundary_fact(cfg);
                out_facts.insert(entry, boundary.clone());
                boundary_facts.insert(entry, boundary);
            }
        }

        let mut worklist = Worklist::new(icfg.graph(), false);
        for node in icfg.nodes() {
            worklist.insert(node);
        }
        while let Some(node) = worklist.pop() {
            let mut in_fact = match boundary_facts.get(&node) {
                Some(boundary) => boundary.clone(),
                None => self.analysis.new_initial_fact(),
            };
            for (source, edge) in icfg.in_edges_of(node) {
                let fact = self.analysis.transfer_edge(edge, &out_facts[&source]);
                self.analysis.meet_into(&fact, &mut in_fact);
            }
            let out_fact = out_facts
                .get_mut(&node)
                .expect("Output fact of a graph node missing");
            let icfg_node = &icfg.graph()[node];
            let changed = if icfg.is_call_site(node) {
                self.analysis
                    .transfer_call_node(icfg_node, &in_fact, out_fact)
            } else {
                self.analysis
                    .transfer_non_call_node(icfg_node, &in_fact, out_fact)
            };
            in_facts.insert(node, in_fact);
            if changed {
                for successor in icfg.get_succs_of(node) {
                    worklist.insert(successor);
                }
            }
        }

        let mut result = DataflowResult::new();
        for (node, fact) in in_facts {
            result.set_in_fact(node, fact);
        }
        for (node, fact) in out_facts {
            result.set_out_fact(node, fact);
        }
        result
    }
}

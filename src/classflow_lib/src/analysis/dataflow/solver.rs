use super::*;
use crate::prelude::*;
use petgraph::Direction;

/// The fixpoint strategy of a [`Solver`].
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Only revisit nodes whose inputs changed, ordered by priority (see [`Worklist`]).
    #[default]
    WorkList,
    /// Chaotic iteration: sweep over all nodes until no fact changes during a whole sweep.
    Iterative,
}

/// Computes the fixpoint of a dataflow analysis over control flow graphs.
///
/// Both strategies compute the least fixpoint above the boundary fact
/// and thus yield identical results for monotonic analyses.
pub struct Solver<A: DataflowAnalysis> {
    analysis: A,
    kind: SolverKind,
}

impl<A: DataflowAnalysis> Solver<A> {
    /// Create a new solver for the given analysis.
    pub fn new(analysis: A, kind: SolverKind) -> Solver<A> {
        Solver { analysis, kind }
    }

    /// Solve the analysis on the given control flow graph.
    pub fn solve(&self, cfg: &Cfg) -> DataflowResult<A::Fact> {
        self.solve_from(cfg, self.initialize(cfg))
    }

    /// Continue the fixpoint computation from the facts of a previous (possibly partial) result.
    ///
    /// Nodes without facts in `result` get the initial fact.
    /// The boundary fact is kept as found in `result`.
    pub fn solve_from(
        &self,
        cfg: &Cfg,
        mut result: DataflowResult<A::Fact>,
    ) -> DataflowResult<A::Fact> {
        let forward = self.analysis.is_forward();
        let boundary = if forward { cfg.entry() } else { cfg.exit() };
        // The direction of the edges whose facts flow into the input of a node.
        let incoming = if forward {
            Direction::Incoming
        } else {
            Direction::Outgoing
        };
        let (in_facts, out_facts) = result.facts_mut();
        let (inputs, outputs) = if forward {
            (in_facts, out_facts)
        } else {
            (out_facts, in_facts)
        };
        for node in cfg.nodes() {
            inputs
                .entry(node)
                .or_insert_with(|| self.analysis.new_initial_fact());
            outputs
                .entry(node)
                .or_insert_with(|| self.analysis.new_initial_fact());
        }

        match self.kind {
            SolverKind::WorkList => {
                let mut worklist = Worklist::new(cfg.graph(), !forward);
                for node in cfg.nodes().filter(|node| *node != boundary) {
                    worklist.insert(node);
                }
                while let Some(node) = worklist.pop() {
                    if self.update_node(cfg, node, incoming, inputs, outputs) {
                        for target in cfg.graph().neighbors_directed(node, incoming.opposite()) {
                            if target != boundary {
                                worklist.insert(target);
                            }
                        }
                    }
                }
            }
            SolverKind::Iterative => {
                let mut sweep_order: Vec<NodeIndex> =
                    cfg.nodes().filter(|node| *node != boundary).collect();
                if !forward {
                    sweep_order.reverse();
                }
                let mut changed = true;
                while changed {
                    changed = false;
                    for node in sweep_order.iter() {
                        changed |= self.update_node(cfg, *node, incoming, inputs, outputs);
                    }
                }
            }
        }
        result
    }

    /// Create the result with the boundary fact installed and all other facts initialized.
    fn initialize(&self, cfg: &Cfg) -> DataflowResult<A::Fact> {
        let mut result = DataflowResult::new();
        for node in cfg.nodes() {
            result.set_in_fact(node, self.analysis.new_initial_fact());
            result.set_out_fact(node, self.analysis.new_initial_fact());
        }
        let boundary_fact = self.analysis.new_boundary_fact(cfg);
        if self.analysis.is_forward() {
            result.set_out_fact(cfg.entry(), boundary_fact);
        } else {
            result.set_in_fact(cfg.exit(), boundary_fact);
        }
        result
    }

    /// Recompute the input of a node from its neighbors and apply the transfer function.
    /// Returns `true` if the output of the node changed.
    fn update_node(
        &self,
        cfg: &Cfg,
        node: NodeIndex,
        incoming: Direction,
        inputs: &mut FnvHashMap<NodeIndex, A::Fact>,
        outputs: &mut FnvHashMap<NodeIndex, A::Fact>,
    ) -> bool {
        let mut input = self.analysis.new_initial_fact();
        for source in cfg.graph().neighbors_directed(node, incoming) {
            self.analysis.meet_into(&outputs[&source], &mut input);
        }
        inputs.insert(node, input);
        let output = outputs
            .get_mut(&node)
            .expect("Output fact of a graph node missing");
        self.analysis
            .transfer_node(&cfg.graph()[node], &inputs[&node], output)
    }
}

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Reversed;
use std::collections::{BTreeMap, BTreeSet};

/// A worklist of graph nodes ordered by priority.
///
/// Nodes are ranked by the order of the strongly connected components computed by Kosaraju's algorithm,
/// i.e. (up to the order inside cyclic components) in weak topological order.
/// The node with the highest priority is taken first,
/// so that nodes closer to the sources of the graph get stabilized before the nodes depending on them.
pub struct Worklist {
    /// maps a node index to its priority (higher priority nodes get stabilized first)
    node_priority_list: Vec<usize>,
    /// maps a priority to the corresponding node index
    priority_to_node_list: Vec<NodeIndex>,
    /// The worklist contains the priority numbers (not the node indices!) of nodes marked as not yet stabilized.
    worklist: BTreeSet<usize>,
}

impl Worklist {
    /// Create an empty worklist for the nodes of the given graph.
    ///
    /// If `reversed` is set, priorities are computed for the graph with all edges reversed,
    /// which is the correct order for backward analyses.
    pub fn new<N, E>(graph: &DiGraph<N, E>, reversed: bool) -> Worklist {
        // order the nodes in weak topological order
        let components = if reversed {
            petgraph::algo::kosaraju_scc(Reversed(graph))
        } else {
            petgraph::algo::kosaraju_scc(graph)
        };
        Self::from_node_priority_list(components.into_iter().flatten().collect())
    }

    /// Create an empty worklist from the list of nodes of the graph ordered by priority.
    /// Nodes with a higher index in the `priority_sorted_nodes` array are taken before those with a lower index.
    pub fn from_node_priority_list(priority_sorted_nodes: Vec<NodeIndex>) -> Worklist {
        let mut node_to_index = BTreeMap::new();
        for (i, node_index) in priority_sorted_nodes.iter().enumerate() {
            node_to_index.insert(node_index, i);
        }
        let node_priority_list: Vec<usize> = node_to_index.values().copied().collect();
        Worklist {
            node_priority_list,
            priority_to_node_list: priority_sorted_nodes,
            worklist: BTreeSet::new(),
        }
    }

    /// Mark the node as not yet stabilized.
    pub fn insert(&mut self, node: NodeIndex) {
        self.worklist.insert(self.node_priority_list[node.index()]);
    }

    /// Remove the highest priority node from the worklist and return it.
    pub fn pop(&mut self) -> Option<NodeIndex> {
        let priority = self.worklist.pop_last()?;
        Some(self.priority_to_node_list[priority])
    }

    /// Returns `true` if no node is marked as not yet stabilized.
    pub fn is_empty(&self) -> bool {
        self.worklist.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_first() {
        // 0 -> 1 -> 2 <-> 3
        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..4).map(|_| graph.add_node(())).collect();
        graph.add_edge(nodes[0], nodes[1], ());
        graph.add_edge(nodes[1], nodes[2], ());
        graph.add_edge(nodes[2], nodes[3], ());
        graph.add_edge(nodes[3], nodes[2], ());

        let mut worklist = Worklist::new(&graph, false);
        for node in nodes.iter().rev() {
            worklist.insert(*node);
        }
        worklist.insert(nodes[1]);
        assert_eq!(worklist.pop(), Some(nodes[0]));
        assert_eq!(worklist.pop(), Some(nodes[1]));
        let cycle = [worklist.pop().unwrap(), worklist.pop().unwrap()];
        assert!(cycle.contains(&nodes[2]) && cycle.contains(&nodes[3]));
        assert!(worklist.is_empty());
        assert_eq!(worklist.pop(), None);

        let mut backward = Worklist::new(&graph, true);
        backward.insert(nodes[0]);
        backward.insert(nodes[1]);
        assert_eq!(backward.pop(), Some(nodes[1]));
        assert_eq!(backward.pop(), Some(nodes[0]));
    }
}

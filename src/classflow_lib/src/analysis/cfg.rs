//! Generate control flow graphs out of method bodies.
//!
//! The generated graphs follow some basic principles:
//! * Each statement of the method body is converted into exactly one node.
//! * Two artificial nodes, *Entry* and *Exit*, without statement semantics are added.
//! The entry node has an edge to the first statement
//! and all `return` and `throw` statements have an edge to the exit node.
//! * **Edges** are labeled with their [`CfgEdge`] kind,
//! which lets analyses (e.g. the dead code detection) distinguish the branches of conditional jumps.
//!
//! Statements that are not reachable from the entry node are still part of the graph.

use crate::intermediate_representation::*;
use crate::prelude::*;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// The node type of a control flow graph.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CfgNode<'a> {
    /// The artificial entry node.
    Entry,
    /// A statement together with its index in the method body.
    Stmt(usize, &'a Stmt),
    /// The artificial exit node.
    Exit,
}

impl<'a> CfgNode<'a> {
    /// Return the statement of the node, if the node is not artificial.
    pub fn get_stmt(&self) -> Option<&'a Stmt> {
        match self {
            CfgNode::Stmt(_, stmt) => Some(stmt),
            CfgNode::Entry | CfgNode::Exit => None,
        }
    }

    /// Return the index of the statement in the method body, if the node is not artificial.
    pub fn get_index(&self) -> Option<usize> {
        match self {
            CfgNode::Stmt(index, _) => Some(*index),
            CfgNode::Entry | CfgNode::Exit => None,
        }
    }
}

impl<'a> std::fmt::Display for CfgNode<'a> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CfgNode::Entry => write!(formatter, "[Entry]"),
            CfgNode::Stmt(index, stmt) => write!(formatter, "{}@{}", stmt, index),
            CfgNode::Exit => write!(formatter, "[Exit]"),
        }
    }
}

/// The edge type of a control flow graph.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CfgEdge {
    /// From the entry node to the first statement.
    Entry,
    /// To the next statement in the method body.
    FallThrough,
    /// An unconditional jump.
    Goto,
    /// The branch taken if the condition of an `If` statement holds.
    IfTrue,
    /// The branch taken if the condition of an `If` statement does not hold.
    IfFalse,
    /// The branch of a `Switch` statement taken for the given case value.
    SwitchCase(i32),
    /// The branch of a `Switch` statement taken if no case value matches.
    SwitchDefault,
    /// From a `Return` statement to the exit node.
    Return,
    /// From a `Throw` statement to the exit node.
    Exceptional,
}

/// The control flow graph of a single method.
pub struct Cfg<'a> {
    method: &'a Method,
    graph: DiGraph<CfgNode<'a>, CfgEdge>,
    entry: NodeIndex,
    exit: NodeIndex,
    /// The node index of each statement, indexed by the statement index.
    stmt_nodes: Vec<NodeIndex>,
}

impl<'a> Cfg<'a> {
    /// Build the control flow graph of the given method.
    ///
    /// The method body is assumed to be well-formed, i.e. all branch targets are valid statement indices.
    /// See [`Program::validate`].
    pub fn new(method: &'a Method) -> Cfg<'a> {
        let mut graph = DiGraph::new();
        let entry = graph.add_node(CfgNode::Entry);
        let stmt_nodes: Vec<NodeIndex> = method
            .body
            .iter()
            .enumerate()
            .map(|(index, stmt)| graph.add_node(CfgNode::Stmt(index, stmt)))
            .collect();
        let exit = graph.add_node(CfgNode::Exit);

        let node_after = |index: usize| stmt_nodes.get(index + 1).copied().unwrap_or(exit);
        graph.add_edge(entry, stmt_nodes.first().copied().unwrap_or(exit), CfgEdge::Entry);
        for (index, stmt) in method.body.iter().enumerate() {
            let node = stmt_nodes[index];
            match stmt {
                Stmt::Goto(target) => {
                    graph.add_edge(node, stmt_nodes[*target], CfgEdge::Goto);
                }
                Stmt::If { target, .. } => {
                    graph.add_edge(node, stmt_nodes[*target], CfgEdge::IfTrue);
                    graph.add_edge(node, node_after(index), CfgEdge::IfFalse);
                }
                Stmt::Switch { cases, default, .. } => {
                    for (value, target) in cases {
                        graph.add_edge(node, stmt_nodes[*target], CfgEdge::SwitchCase(*value));
                    }
                    graph.add_edge(node, stmt_nodes[*default], CfgEdge::SwitchDefault);
                }
                Stmt::Return(_) => {
                    graph.add_edge(node, exit, CfgEdge::Return);
                }
                Stmt::Throw(_) => {
                    graph.add_edge(node, exit, CfgEdge::Exceptional);
                }
                Stmt::Assign { .. } | Stmt::Store { .. } | Stmt::Invoke(_) | Stmt::Nop => {
                    graph.add_edge(node, node_after(index), CfgEdge::FallThrough);
                }
            }
        }
        Cfg {
            method,
            graph,
            entry,
            exit,
            stmt_nodes,
        }
    }

    /// Get the method that the graph belongs to.
    pub fn method(&self) -> &'a Method {
        self.method
    }

    /// Get the underlying graph.
    pub fn graph(&self) -> &DiGraph<CfgNode<'a>, CfgEdge> {
        &self.graph
    }

    /// The entry node.
    pub fn entry(&self) -> NodeIndex {
        self.entry
    }

    /// The exit node.
    pub fn exit(&self) -> NodeIndex {
        self.exit
    }

    /// Returns `true` if the node is the exit node.
    pub fn is_exit(&self, node: NodeIndex) -> bool {
        node == self.exit
    }

    /// Get the node of the statement with the given index.
    pub fn node_of(&self, stmt_index: usize) -> Option<NodeIndex> {
        self.stmt_nodes.get(stmt_index).copied()
    }

    /// Iterate over all nodes in the order entry, statements (in program order), exit.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Get the predecessors of a node.
    /// Nodes connected by several edges are returned once per edge.
    pub fn get_preds_of(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Get the successors of a node.
    /// Nodes connected by several edges are returned once per edge.
    pub fn get_succs_of(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Get the outgoing edges of a node together with their kind and target node.
    pub fn out_edges_of(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, CfgEdge, NodeIndex)> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.id(), *edge.weight(), edge.target()))
    }
}

//! The interprocedural control flow graph (ICFG).
//!
//! The ICFG is the union of the control flow graphs of all methods in a call graph,
//! connected at the call sites:
//! * Every edge of a method's CFG leaving a non-call statement becomes a [`Normal`](IcfgEdge::Normal) edge.
//! * Every edge of a method's CFG leaving a call statement becomes a [`CallToReturn`](IcfgEdge::CallToReturn) edge.
//! Information about the caller's local variables flows along these edges past the call.
//! * For every call graph edge there is a [`Call`](IcfgEdge::Call) edge from the call site to the entry of the callee
//! and a [`Return`](IcfgEdge::Return) edge from the exit of the callee to every successor of the call site.

use super::callgraph::CallGraph;
use super::cfg::{Cfg, CfgEdge, CfgNode};
use crate::intermediate_representation::*;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// A node of the ICFG: a node of the CFG of a method, tagged with the method.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct IcfgNode<'a> {
    /// The method containing the node.
    pub method: &'a Method,
    /// The index of the node in the CFG of the method.
    pub local: NodeIndex,
    /// The CFG node.
    pub node: CfgNode<'a>,
}

impl<'a> IcfgNode<'a> {
    /// Return the call statement of the node, if it is a call site.
    pub fn get_invoke(&self) -> Option<&'a Invoke> {
        self.node.get_stmt().and_then(Stmt::as_invoke)
    }
}

impl<'a> std::fmt::Display for IcfgNode<'a> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{} in {}", self.node, self.method)
    }
}

/// An edge of the ICFG.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum IcfgEdge<'a> {
    /// An intraprocedural edge not leaving a call site.
    Normal(CfgEdge),
    /// An intraprocedural edge leaving a call site.
    CallToReturn {
        /// The kind of the CFG edge.
        kind: CfgEdge,
        /// The call statement at the source of the edge.
        invoke: &'a Invoke,
    },
    /// From a call site to the entry node of a callee.
    Call {
        /// The call statement at the source of the edge.
        invoke: &'a Invoke,
        /// The called method.
        callee: &'a Method,
    },
    /// From the exit node of a callee to a successor of the call site.
    Return {
        /// The call statement whose call returns along this edge.
        invoke: &'a Invoke,
        /// The method returned from.
        callee: &'a Method,
        /// The variables returned by the callee.
        return_vars: Vec<&'a Variable>,
    },
}

/// The CFG of a method together with the ICFG indices of its nodes.
struct MethodCfg<'a> {
    cfg: Cfg<'a>,
    /// The ICFG node index of each CFG node, indexed by the CFG node index.
    nodes: Vec<NodeIndex>,
}

/// The interprocedural control flow graph of the methods of a call graph.
pub struct Icfg<'a> {
    graph: DiGraph<IcfgNode<'a>, IcfgEdge<'a>>,
    cfgs: Vec<MethodCfg<'a>>,
    method_to_cfg: HashMap<MethodRef, usize>,
    entry_methods: Vec<&'a Method>,
}

impl<'a> Icfg<'a> {
    /// Build the ICFG of all methods contained in the given call graph.
    pub fn new(call_graph: &CallGraph<'a>) -> Icfg<'a> {
        let mut icfg = Icfg {
            graph: DiGraph::new(),
            cfgs: Vec::new(),
            method_to_cfg: HashMap::new(),
            entry_methods: call_graph.entry_methods().collect(),
        };
        for method in call_graph.reachable_methods() {
            icfg.add_method(method);
        }
        for method_cfg in icfg.cfgs.iter() {
            let cfg = &method_cfg.cfg;
            for local in cfg.nodes() {
                let invoke = cfg.graph()[local].get_stmt().and_then(Stmt::as_invoke);
                for (_, kind, target) in cfg.out_edges_of(local) {
                    let edge = match invoke {
                        Some(invoke) => IcfgEdge::CallToReturn { kind, invoke },
                        None => IcfgEdge::Normal(kind),
                    };
                    icfg.graph.add_edge(
                        method_cfg.nodes[local.index()],
                        method_cfg.nodes[target.index()],
                        edge,
                    );
                }
            }
        }
        for (caller, call_edge, callee) in call_graph.edges() {
            let caller_cfg = &icfg.cfgs[icfg.method_to_cfg[&caller.get_ref()]];
            let callee_cfg = &icfg.cfgs[icfg.method_to_cfg[&callee.get_ref()]];
            let call_site = match caller_cfg.cfg.node_of(call_edge.call_site) {
                Some(node) => node,
                None => continue,
            };
            icfg.graph.add_edge(
                caller_cfg.nodes[call_site.index()],
                callee_cfg.nodes[callee_cfg.cfg.entry().index()],
                IcfgEdge::Call {
                    invoke: call_edge.invoke,
                    callee,
                },
            );
            let callee_exit = callee_cfg.nodes[callee_cfg.cfg.exit().index()];
            for return_site in caller_cfg.cfg.get_succs_of(call_site) {
                icfg.graph.add_edge(
                    callee_exit,
                    caller_cfg.nodes[return_site.index()],
                    IcfgEdge::Return {
                        invoke: call_edge.invoke,
                        callee,
                        return_vars: callee.return_vars(),
                    },
                );
            }
        }
        icfg
    }

    /// Add the nodes of the CFG of the method.
    fn add_method(&mut self, method: &'a Method) {
        let cfg = Cfg::new(method);
        let nodes = cfg
            .nodes()
            .map(|local| {
                self.graph.add_node(IcfgNode {
                    method,
                    local,
                    node: cfg.graph()[local],
                })
            })
            .collect();
        self.method_to_cfg.insert(method.get_ref(), self.cfgs.len());
        self.cfgs.push(MethodCfg { cfg, nodes });
    }

    /// Get the underlying graph.
    pub fn graph(&self) -> &DiGraph<IcfgNode<'a>, IcfgEdge<'a>> {
        &self.graph
    }

    /// Iterate over the entry methods of the underlying call graph.
    pub fn entry_methods(&self) -> impl Iterator<Item = &'a Method> + '_ {
        self.entry_methods.iter().copied()
    }

    /// Iterate over all methods contained in the graph.
    pub fn methods(&self) -> impl Iterator<Item = &'a Method> + '_ {
        self.cfgs.iter().map(|method_cfg| method_cfg.cfg.method())
    }

    fn get_method_cfg(&self, method: &MethodRef) -> Option<&MethodCfg<'a>> {
        self.method_to_cfg.get(method).map(|index| &self.cfgs[*index])
    }

    /// Get the CFG of a method.
    pub fn get_cfg_of(&self, method: &MethodRef) -> Option<&Cfg<'a>> {
        self.get_method_cfg(method).map(|method_cfg| &method_cfg.cfg)
    }

    /// Get the entry node of a method.
    pub fn get_entry_of(&self, method: &MethodRef) -> Option<NodeIndex> {
        let method_cfg = self.get_method_cfg(method)?;
        Some(method_cfg.nodes[method_cfg.cfg.entry().index()])
    }

    /// Get the exit node of a method.
    pub fn get_exit_of(&self, method: &MethodRef) -> Option<NodeIndex> {
        let method_cfg = self.get_method_cfg(method)?;
        Some(method_cfg.nodes[method_cfg.cfg.exit().index()])
    }

    /// Get the node of the statement with the given index in the given method.
    pub fn node_of(&self, method: &MethodRef, stmt_index: usize) -> Option<NodeIndex> {
        let method_cfg = self.get_method_cfg(method)?;
        let local = method_cfg.cfg.node_of(stmt_index)?;
        Some(method_cfg.nodes[local.index()])
    }

    /// Get the method containing the node.
    pub fn get_containing_method_of(&self, node: NodeIndex) -> &'a Method {
        self.graph[node].method
    }

    /// Returns `true` if the node is a call statement.
    pub fn is_call_site(&self, node: NodeIndex) -> bool {
        self.graph[node].get_invoke().is_some()
    }

    /// Iterate over all nodes of the graph.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterate over the incoming edges of a node as pairs of source node and edge.
    pub fn in_edges_of(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &IcfgEdge<'a>)> + '_ {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| (edge.source(), edge.weight()))
    }

    /// Iterate over the outgoing edges of a node as pairs of edge and target node.
    pub fn out_edges_of(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (&IcfgEdge<'a>, NodeIndex)> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.weight(), edge.target()))
    }

    /// Get the predecessors of a node.
    pub fn get_preds_of(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Get the successors of a node.
    pub fn get_succs_of(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::callgraph::build_cha_call_graph;
    use crate::stmts;

    fn static_method(subsignature: &str, params: &[&str], body: Vec<Stmt>) -> Method {
        Method {
            is_static: true,
            ..Method::mock("A", subsignature, params, body)
        }
    }

    fn mock_program() -> Program {
        Program::mock(
            vec![Class::mock(
                "A",
                None,
                vec![
                    static_method(
                        "void main()",
                        &[],
                        stmts![
                            "x = 1",
                            "y = invokestatic <A: int id(int)>(x)",
                            "if y > 0 goto 4",
                            "invokestatic <A: void missing()>()",
                            "return"
                        ],
                    ),
                    static_method(
                        "int id(int)",
                        &["p"],
                        stmts!["if p > 0 goto 2", "return p", "r = p", "return r"],
                    ),
                ],
            )],
            None,
        )
    }

    #[test]
    fn edge_shapes() {
        let program = mock_program();
        let hierarchy = ProgramHierarchy::new(&program);
        let main_ref = MethodRef::new("A", "void main()");
        let id_ref = MethodRef::new("A", "int id(int)");
        let (call_graph, _) = build_cha_call_graph(&hierarchy, program.get_method(&main_ref).unwrap());
        let icfg = Icfg::new(&call_graph);

        assert_eq!(icfg.nodes().count(), 7 + 6);
        assert_eq!(
            icfg.entry_methods().map(|method| method.get_ref()).collect::<Vec<_>>(),
            vec![main_ref.clone()]
        );
        assert_eq!(icfg.get_cfg_of(&id_ref).unwrap().method().get_ref(), id_ref);

        let call_site = icfg.node_of(&main_ref, 1).unwrap();
        let return_site = icfg.node_of(&main_ref, 2).unwrap();
        assert!(icfg.is_call_site(call_site));
        assert!(icfg.is_call_site(icfg.node_of(&main_ref, 3).unwrap()));
        assert!(!icfg.is_call_site(return_site));
        assert_eq!(icfg.get_containing_method_of(call_site).get_ref(), main_ref);

        let mut succs: Vec<NodeIndex> = icfg.get_succs_of(call_site).collect();
        succs.sort();
        let mut expected = vec![return_site, icfg.get_entry_of(&id_ref).unwrap()];
        expected.sort();
        assert_eq!(succs, expected);
        let call_edges: Vec<&IcfgEdge> = icfg.out_edges_of(call_site).map(|(edge, _)| edge).collect();
        assert!(call_edges.iter().any(|edge| matches!(edge, IcfgEdge::Call { .. })));
        assert!(call_edges
            .iter()
            .any(|edge| matches!(edge, IcfgEdge::CallToReturn { kind: CfgEdge::FallThrough, .. })));

        let in_edges: Vec<(NodeIndex, &IcfgEdge)> = icfg.in_edges_of(return_site).collect();
        assert_eq!(in_edges.len(), 2);
        for (source, edge) in in_edges {
            match edge {
                IcfgEdge::Return { return_vars, callee, .. } => {
                    assert_eq!(source, icfg.get_exit_of(&id_ref).unwrap());
                    assert_eq!(callee.get_ref(), id_ref);
                    let names: Vec<&str> = return_vars.iter().map(|var| var.name.as_str()).collect();
                    assert_eq!(names, vec!["p", "r"]);
                }
                IcfgEdge::CallToReturn { .. } => assert_eq!(source, call_site),
                _ => panic!("Unexpected edge {:?}", edge),
            }
        }

        // unresolved calls only have call-to-return edges
        let unresolved = icfg.node_of(&main_ref, 3).unwrap();
        assert_eq!(icfg.get_succs_of(unresolved).count(), 1);
        // the exit of the callee returns to the single successor of the call site
        assert_eq!(
            icfg.get_preds_of(return_site).count(),
            2
        );
        assert!(icfg
            .in_edges_of(icfg.node_of(&id_ref, 0).unwrap())
            .all(|(_, edge)| *edge == IcfgEdge::Normal(CfgEdge::Entry)));
    }
}

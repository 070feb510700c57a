//! Call graphs and their construction by class hierarchy analysis (CHA).
//!
//! CHA resolves a dynamically dispatched call by looking at all subtypes of the statically named class
//! and collecting the method each of them would dispatch to.
//! The result over-approximates the possible call targets,
//! since it does not track which classes are actually instantiated.

use crate::intermediate_representation::*;
use crate::prelude::*;
use crate::utils::log::{LogMessage, Location};
use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// An edge of the call graph, i.e. a call site together with one of its resolved callees.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CallEdge<'a> {
    /// The kind of the call site.
    pub kind: CallKind,
    /// The index of the call statement in the body of the caller.
    pub call_site: usize,
    /// The call statement.
    pub invoke: &'a Invoke,
}

/// A call graph whose nodes are the reachable methods of a program.
///
/// Each method is represented by exactly one node.
/// An edge from a caller to a callee exists for every call site of the caller that may invoke the callee.
pub struct CallGraph<'a> {
    graph: DiGraph<&'a Method, CallEdge<'a>>,
    method_to_node: HashMap<MethodRef, NodeIndex>,
    entry_methods: Vec<NodeIndex>,
    /// `(caller, call site, callee)` triples of all edges, used to absorb duplicates
    edges: HashSet<(NodeIndex, usize, NodeIndex)>,
}

impl<'a> Default for CallGraph<'a> {
    fn default() -> Self {
        CallGraph::new()
    }
}

impl<'a> CallGraph<'a> {
    /// Create an empty call graph.
    pub fn new() -> CallGraph<'a> {
        CallGraph {
            graph: DiGraph::new(),
            method_to_node: HashMap::new(),
            entry_methods: Vec::new(),
            edges: HashSet::new(),
        }
    }

    /// Add a method to the graph if it is not already contained in it.
    fn add_method(&mut self, method: &'a Method) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .method_to_node
            .entry(method.get_ref())
            .or_insert_with(|| graph.add_node(method))
    }

    /// Add an entry method to the graph.
    pub fn add_entry_method(&mut self, method: &'a Method) {
        let node = self.add_method(method);
        if !self.entry_methods.contains(&node) {
            self.entry_methods.push(node);
        }
    }

    /// Add an edge from the call site with index `call_site` in `caller` to `callee`.
    ///
    /// Returns `Ok(true)` if the edge is new and `Ok(false)` if it was already contained in the graph.
    /// Returns an error if the statement at `call_site` is not a call
    /// or if the number of arguments of the call differs from the number of parameters of the callee.
    pub fn add_edge(
        &mut self,
        caller: &'a Method,
        call_site: usize,
        callee: &'a Method,
    ) -> Result<bool, Error> {
        let invoke = caller
            .body
            .get(call_site)
            .and_then(Stmt::as_invoke)
            .ok_or_else(|| anyhow!("Statement {} of {} is not a call", call_site, caller))?;
        if invoke.args.len() != callee.params.len() {
            return Err(anyhow!(
                "Call passes {} arguments to {} with {} parameters",
                invoke.args.len(),
                callee,
                callee.params.len()
            ));
        }
        let source = self.add_method(caller);
        let target = self.add_method(callee);
        if !self.edges.insert((source, call_site, target)) {
            return Ok(false);
        }
        self.graph.add_edge(
            source,
            target,
            CallEdge {
                kind: invoke.kind,
                call_site,
                invoke,
            },
        );
        Ok(true)
    }

    /// Returns `true` if the method is contained in the call graph.
    pub fn contains(&self, method: &MethodRef) -> bool {
        self.method_to_node.contains_key(method)
    }

    /// Get the underlying graph.
    pub fn graph(&self) -> &DiGraph<&'a Method, CallEdge<'a>> {
        &self.graph
    }

    /// Iterate over all methods of the graph.
    pub fn reachable_methods(&self) -> impl Iterator<Item = &'a Method> + '_ {
        self.graph.node_weights().copied()
    }

    /// Iterate over the entry methods of the graph.
    pub fn entry_methods(&self) -> impl Iterator<Item = &'a Method> + '_ {
        self.entry_methods.iter().map(|node| self.graph[*node])
    }

    /// Get the node index of the given method.
    pub fn node_of(&self, method: &MethodRef) -> Option<NodeIndex> {
        self.method_to_node.get(method).copied()
    }

    /// Get all methods that the call site with index `call_site` in the given method may call.
    pub fn get_callees_of_call_site(&self, caller: &MethodRef, call_site: usize) -> Vec<&'a Method> {
        match self.node_of(caller) {
            Some(node) => self
                .graph
                .edges_directed(node, Direction::Outgoing)
                .filter(|edge| edge.weight().call_site == call_site)
                .map(|edge| self.graph[edge.target()])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Get all methods that the given method may call, without duplicates.
    pub fn get_callees_of(&self, caller: &MethodRef) -> Vec<&'a Method> {
        let node = match self.node_of(caller) {
            Some(node) => node,
            None => return Vec::new(),
        };
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .unique()
            .map(|node| self.graph[node])
            .collect()
    }

    /// Get all call sites that may call the given method as pairs of the calling method and the call site index.
    pub fn get_callers_of(&self, callee: &MethodRef) -> Vec<(&'a Method, usize)> {
        match self.node_of(callee) {
            Some(node) => self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|edge| (self.graph[edge.source()], edge.weight().call_site))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Iterate over all edges as `(caller, edge, callee)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (&'a Method, &CallEdge<'a>, &'a Method)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()],
                edge.weight(),
                self.graph[edge.target()],
            )
        })
    }

    /// The number of edges of the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Build the call graph of all methods reachable from `entry` with class hierarchy analysis.
///
/// Call sites without resolvable targets get no outgoing edges.
/// Edges rejected by [`CallGraph::add_edge`] are reported as debug log messages.
pub fn build_cha_call_graph<'a, H: ClassHierarchy>(
    hierarchy: &'a H,
    entry: &'a Method,
) -> (CallGraph<'a>, Vec<LogMessage>) {
    let mut call_graph = CallGraph::new();
    let mut logs = Vec::new();
    call_graph.add_entry_method(entry);
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([entry]);
    while let Some(method) = queue.pop_front() {
        if !visited.insert(method.get_ref()) {
            continue;
        }
        for (call_site, invoke) in method.call_sites() {
            for callee in resolve(hierarchy, invoke) {
                match call_graph.add_edge(method, call_site, callee) {
                    Ok(_) => queue.push_back(callee),
                    Err(err) => logs.push(
                        LogMessage::new_debug(format!("{:#}", err))
                            .location(Location::stmt(method.get_ref(), call_site))
                            .source("cha"),
                    ),
                }
            }
        }
    }
    (call_graph, logs)
}

/// Compute the possible targets of a call.
///
/// * Static calls target the method declared in the named class.
/// * Special calls target the method that the named class dispatches to.
/// * Virtual and interface calls target the methods that the named class and all its subtypes dispatch to.
pub fn resolve<'a, H: ClassHierarchy>(hierarchy: &'a H, invoke: &Invoke) -> Vec<&'a Method> {
    let class = invoke.method_ref.declaring_class.as_str();
    let subsignature = &invoke.method_ref.subsignature;
    match invoke.kind {
        CallKind::Static => hierarchy
            .get_declared_method(class, subsignature)
            .into_iter()
            .collect(),
        CallKind::Special => dispatch(hierarchy, class, subsignature)
            .into_iter()
            .collect(),
        CallKind::Virtual | CallKind::Interface => {
            let mut targets: Vec<&'a Method> = Vec::new();
            let mut visited = HashSet::new();
            let mut queue = VecDeque::from([class]);
            while let Some(class) = queue.pop_front() {
                if !visited.insert(class) {
                    continue;
                }
                if let Some(target) = dispatch(hierarchy, class, subsignature) {
                    if !targets.iter().any(|known| std::ptr::eq(*known, target)) {
                        targets.push(target);
                    }
                }
                if hierarchy.is_interface(class) {
                    queue.extend(
                        hierarchy
                            .get_direct_subinterfaces_of(class)
                            .iter()
                            .chain(hierarchy.get_direct_implementors_of(class))
                            .map(String::as_str),
                    );
                } else {
                    queue.extend(
                        hierarchy
                            .get_direct_subclasses_of(class)
                            .iter()
                            .map(String::as_str),
                    );
                }
            }
            targets
        }
    }
}

/// Find the method that a call of the given subsignature on an object of the given class executes,
/// i.e. the first non-abstract declaration found when walking up the superclass chain.
pub fn dispatch<'a, H: ClassHierarchy>(
    hierarchy: &'a H,
    class: &str,
    subsignature: &Subsignature,
) -> Option<&'a Method> {
    let mut current = Some(class);
    while let Some(class) = current {
        if let Some(method) = hierarchy.get_declared_method(class, subsignature) {
            if !method.is_abstract {
                return Some(method);
            }
        }
        current = hierarchy.get_super_class(class);
    }
    None
}

#[cfg(test)]
mod tests;

//! Dead code detection.
//!
//! A statement is reported as dead if it is either
//! * unreachable from the entry of its method, where branches whose condition is constant
//!   (according to the constant propagation) are only followed in the direction actually taken,
//! * or a dead assignment, i.e. an assignment without side effects to a variable that is not live after it.
//!
//! Dead assignments do not block the reachability of the statements following them.

use super::cfg::{Cfg, CfgEdge, CfgNode};
use super::constant_propagation::evaluate;
use super::dataflow::DataflowResult;
use crate::abstract_domain::{CpFact, SetFact, Value};
use crate::intermediate_representation::*;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Compute the indices of all dead statements of the method of the control flow graph in ascending order.
///
/// `constants` and `live_variables` are the results of the constant propagation
/// and the live variable analysis for the same control flow graph.
pub fn find_dead_code(
    cfg: &Cfg,
    constants: &DataflowResult<CpFact>,
    live_variables: &DataflowResult<SetFact<Variable>>,
) -> Vec<usize> {
    let mut live_stmts = BTreeSet::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([cfg.entry()]);
    visited.insert(cfg.entry());
    while let Some(node) = queue.pop_front() {
        let successors = match &cfg.graph()[node] {
            CfgNode::Stmt(index, stmt) => {
                if !is_dead_assignment(stmt, live_variables.get_out_fact(node)) {
                    live_stmts.insert(*index);
                }
                taken_successors(cfg, node, stmt, constants.get_in_fact(node))
            }
            CfgNode::Entry | CfgNode::Exit => cfg.get_succs_of(node).collect(),
        };
        for successor in successors {
            if visited.insert(successor) {
                queue.push_back(successor);
            }
        }
    }
    (0..cfg.method().body.len())
        .filter(|index| !live_stmts.contains(index))
        .collect()
}

/// An assignment is dead if its right hand side has no side effects
/// and the assigned variable is not live after the assignment.
fn is_dead_assignment(stmt: &Stmt, live_after: Option<&SetFact<Variable>>) -> bool {
    match (stmt, live_after) {
        (Stmt::Assign { var, value }, Some(live_after)) => {
            !live_after.contains(var) && value.has_no_side_effect()
        }
        _ => false,
    }
}

/// Return the successors of the node that may be reached under the given constants.
fn taken_successors(
    cfg: &Cfg,
    node: NodeIndex,
    stmt: &Stmt,
    constants: Option<&CpFact>,
) -> Vec<NodeIndex> {
    let constants = match constants {
        Some(constants) => constants,
        None => return cfg.get_succs_of(node).collect(),
    };
    // the only edge kind that can be taken, if it is known
    let taken_edge = match stmt {
        Stmt::If { condition, .. } => match evaluate(condition, constants) {
            Value::Constant(1) => Some(CfgEdge::IfTrue),
            Value::Constant(0) => Some(CfgEdge::IfFalse),
            _ => None,
        },
        Stmt::Switch { var, cases, .. } => match constants.get(var) {
            Value::Constant(value) if cases.iter().any(|(case, _)| *case == value) => {
                Some(CfgEdge::SwitchCase(value))
            }
            Value::Constant(_) => Some(CfgEdge::SwitchDefault),
            _ => None,
        },
        _ => None,
    };
    cfg.out_edges_of(node)
        .filter(|(_, kind, _)| taken_edge.map_or(true, |taken_edge| *kind == taken_edge))
        .map(|(_, _, target)| target)
        .collect()
}

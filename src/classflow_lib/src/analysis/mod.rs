//! Control flow graphs, fixpoint solvers and the dataflow analyses built on top of them.
//!
//! The intraprocedural analyses ([live variables](live_variables), [constant propagation](constant_propagation)
//! and the [dead code detection](dead_code)) work on the [control flow graph](cfg) of a single method.
//! The [call graph](callgraph) connects the methods of a program
//! and is the basis for the [interprocedural control flow graph](icfg)
//! and the [interprocedural analyses](interprocedural).

pub mod callgraph;
pub mod cfg;
pub mod constant_propagation;
pub mod dataflow;
pub mod dead_code;
pub mod icfg;
pub mod interprocedural;
pub mod live_variables;

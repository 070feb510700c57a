use super::*;
use crate::analysis::constant_propagation::ConstantPropagation;
use crate::analysis::live_variables::LiveVariableAnalysis;
use crate::intermediate_representation::*;
use crate::stmts;

fn mock_methods() -> Vec<Method> {
    vec![
        Method::mock("A", "void empty()", &[], vec![]),
        Method::mock("A", "int f()", &[], stmts!["x = 1", "y = x + 2", "return y"]),
        Method::mock(
            "A",
            "int sum(int)",
            &["n"],
            stmts![
                "s = 0",
                "i = 0",
                "if i >= n goto 7",
                "s = s + i",
                "i = i + 1",
                "k = 3",
                "goto 2",
                "return s"
            ],
        ),
        Method::mock(
            "A",
            "int nested(int)",
            &["p"],
            stmts![
                "a = 0",
                "b = 1",
                "if a >= p goto 9",
                "c = a",
                "if c >= b goto 7",
                "c = c + 1",
                "goto 4",
                "a = a + 1",
                "goto 2",
                "switch p 1:10 2:11 default:12",
                "b = 2",
                "b = 3",
                "return b"
            ],
        ),
        Method::mock(
            "A",
            "int throwing(int)",
            &["p"],
            stmts![
                "if p == 0 goto 3",
                "x = p * 2",
                "return x",
                "throw e:java.lang.Exception",
                "nop"
            ],
        ),
    ]
}

#[test]
fn strategies_agree_forward() {
    for method in mock_methods() {
        let cfg = Cfg::new(&method);
        let worklist = Solver::new(ConstantPropagation, SolverKind::WorkList).solve(&cfg);
        let iterative = Solver::new(ConstantPropagation, SolverKind::Iterative).solve(&cfg);
        assert_eq!(worklist, iterative, "{}", method);
    }
}

#[test]
fn strategies_agree_backward() {
    for method in mock_methods() {
        let cfg = Cfg::new(&method);
        let worklist = Solver::new(LiveVariableAnalysis, SolverKind::WorkList).solve(&cfg);
        let iterative = Solver::new(LiveVariableAnalysis, SolverKind::Iterative).solve(&cfg);
        assert_eq!(worklist, iterative, "{}", method);
    }
}

#[test]
fn solving_a_fixpoint_changes_nothing() {
    for method in mock_methods() {
        let cfg = Cfg::new(&method);
        for kind in [SolverKind::WorkList, SolverKind::Iterative] {
            let solver = Solver::new(ConstantPropagation, kind);
            let result = solver.solve(&cfg);
            assert_eq!(solver.solve_from(&cfg, result.clone()), result);

            let solver = Solver::new(LiveVariableAnalysis, kind);
            let result = solver.solve(&cfg);
            assert_eq!(solver.solve_from(&cfg, result.clone()), result);
        }
    }
}

#[test]
fn every_node_has_facts() {
    for method in mock_methods() {
        let cfg = Cfg::new(&method);
        let result = Solver::new(LiveVariableAnalysis, SolverKind::WorkList).solve(&cfg);
        for node in cfg.nodes() {
            assert!(result.get_in_fact(node).is_some());
            assert!(result.get_out_fact(node).is_some());
        }
    }
}

#[test]
fn boundary_fact_is_kept() {
    let methods = mock_methods();
    let cfg = Cfg::new(&methods[2]);
    let result = Solver::new(ConstantPropagation, SolverKind::Iterative).solve(&cfg);
    let boundary = result.get_out_fact(cfg.entry()).unwrap();
    assert_eq!(boundary.len(), 1);
    assert_eq!(
        boundary.get(&crate::variable!("n")),
        crate::abstract_domain::Value::Nac
    );
    // the fact at the entry is not recomputed from its (nonexisting) predecessors
    assert!(result.get_in_fact(cfg.entry()).unwrap().is_empty());
}

#[test]
fn continue_from_partial_result() {
    let methods = mock_methods();
    let cfg = Cfg::new(&methods[3]);
    let solver = Solver::new(LiveVariableAnalysis, SolverKind::WorkList);
    let mut partial = DataflowResult::new();
    partial.set_in_fact(cfg.exit(), crate::abstract_domain::SetFact::new());
    assert_eq!(solver.solve_from(&cfg, partial), solver.solve(&cfg));
}

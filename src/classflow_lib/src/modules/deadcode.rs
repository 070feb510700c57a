/*!
This module detects dead code.

A statement is dead if it can never be executed,
taking branches with constant conditions into account,
or if it is an assignment without side effects whose value is never read.

For each method containing dead code one finding listing the dead statements is generated.

Configuration:
* `solver`: the fixpoint strategy of the underlying constant propagation and live variable analysis,
either `"worklist"` or `"iterative"`.

False Positives

* None known

False Negatives

* Branches are only pruned if the constant propagation proves the condition constant.
Conditions that are constant only in combination (e.g. `x == x`) are not detected.
*/
use super::parse_config;
use crate::analysis::cfg::Cfg;
use crate::analysis::constant_propagation::compute_constants;
use crate::analysis::dataflow::SolverKind;
use crate::analysis::dead_code::find_dead_code;
use crate::analysis::live_variables::compute_live_variables;
use crate::prelude::*;
use crate::utils::log::{Finding, LogMessage};
use crate::AnalysisContext;
use itertools::Itertools;

const VERSION: &str = "0.1";

/// The module name and version
pub static ANALYSIS_MODULE: crate::AnalysisModule = crate::AnalysisModule {
    name: "deadcode",
    version: VERSION,
    run: report_dead_code,
};

/// The configuration of the module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Config {
    /// The fixpoint strategy.
    #[serde(default)]
    pub solver: SolverKind,
}

/// Report the dead statements of all methods with a body.
pub fn report_dead_code(context: &AnalysisContext, params: &serde_json::Value) -> (Vec<LogMessage>, Vec<Finding>) {
    let config: Config = match parse_config(params) {
        Ok(config) => config,
        Err(err) => {
            return (
                vec![LogMessage::new_error(format!("{:#}", err)).source(ANALYSIS_MODULE.name)],
                Vec::new(),
            )
        }
    };
    let mut findings = Vec::new();
    for method in context.concrete_methods() {
        let cfg = Cfg::new(method);
        let constants = compute_constants(&cfg, config.solver);
        let live_variables = compute_live_variables(&cfg, config.solver);
        let dead_code = find_dead_code(&cfg, &constants, &live_variables);
        if dead_code.is_empty() {
            continue;
        }
        let other: Vec<Vec<String>> = dead_code
            .iter()
            .map(|index| vec![index.to_string(), method.body[*index].to_string()])
            .collect();
        findings.push(
            Finding::new(
                ANALYSIS_MODULE.name,
                ANALYSIS_MODULE.version,
                format!(
                    "(Dead Code) {} contains dead statements {}",
                    method,
                    dead_code.iter().join(", ")
                ),
            )
            .method(method.get_ref())
            .statements(dead_code)
            .other(other),
        );
    }
    (Vec::new(), findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intermediate_representation::*;
    use crate::stmts;

    #[test]
    fn dead_code_findings() {
        let program = Program::mock(
            vec![Class::mock(
                "A",
                None,
                vec![
                    Method::mock("A", "int f()", &[], stmts!["x = 1", "y = 2", "return x"]),
                    Method::mock("A", "int g(int)", &["p"], stmts!["return p"]),
                    Method::mock_abstract("A", "int h()", &[]),
                ],
            )],
            None,
        );
        let hierarchy = ProgramHierarchy::new(&program);
        let context = AnalysisContext::new(&program, &hierarchy);
        let (logs, findings) = report_dead_code(&context, &serde_json::json!({"solver": "iterative"}));
        assert!(logs.is_empty());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].method, Some(MethodRef::new("A", "int f()")));
        assert_eq!(findings[0].statements, vec![1]);
        assert_eq!(findings[0].other, vec![vec!["1".to_string(), "y = 2".to_string()]]);

        let (logs, findings) = report_dead_code(&context, &serde_json::json!({"solver": "fastest"}));
        assert_eq!(logs.len(), 1);
        assert!(findings.is_empty());
    }
}

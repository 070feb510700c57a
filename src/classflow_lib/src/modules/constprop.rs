/*!
This module reports the constants computed by the intraprocedural constant propagation.

For each definition of an integer variable that holds the same constant on all paths,
a finding with the statement index, the variable and the constant is generated.
The parameters and the return values of called methods are treated as unknown.

Configuration:
* `solver`: the fixpoint strategy, either `"worklist"` or `"iterative"`.
*/
use super::parse_config;
use crate::abstract_domain::Value;
use crate::analysis::cfg::Cfg;
use crate::analysis::constant_propagation::compute_constants;
use crate::analysis::dataflow::SolverKind;
use crate::prelude::*;
use crate::utils::log::{Finding, LogMessage};
use crate::AnalysisContext;

const VERSION: &str = "0.1";

/// The module name and version
pub static ANALYSIS_MODULE: crate::AnalysisModule = crate::AnalysisModule {
    name: "constprop",
    version: VERSION,
    run: report_constants,
};

/// The configuration of the module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Config {
    /// The fixpoint strategy.
    #[serde(default)]
    pub solver: SolverKind,
}

/// Report all definitions of variables with constant values.
pub fn report_constants(context: &AnalysisContext, params: &serde_json::Value) -> (Vec<LogMessage>, Vec<Finding>) {
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
        let result = compute_constants(&cfg, config.solver);
        for (index, stmt) in method.body.iter().enumerate() {
            let (var, out_fact) = match (stmt.get_def(), cfg.node_of(index)) {
                (Some(var), Some(node)) => match result.get_out_fact(node) {
                    Some(out_fact) => (var, out_fact),
                    None => continue,
                },
                _ => continue,
            };
            if let Value::Constant(value) = out_fact.get(var) {
                findings.push(
                    Finding::new(
                        ANALYSIS_MODULE.name,
                        ANALYSIS_MODULE.version,
                        format!("{} = {} after statement {} of {}", var, value, index, method),
                    )
                    .method(method.get_ref())
                    .statements(vec![index])
                    .other(vec![vec![var.name.clone(), value.to_string()]]),
                );
            }
        }
    }
    (Vec::new(), findings)
}

/*!
This module reports the live variables of each method.

A variable is live after a statement if its value may be read on some path starting after the statement
before it gets overwritten.

For each method with a body one finding is generated.
Its `other` field contains one entry per statement:
the statement index followed by the names of the variables live after the statement.

Configuration:
* `solver`: the fixpoint strategy, either `"worklist"` or `"iterative"`.
*/
use super::parse_config;
use crate::analysis::cfg::Cfg;
use crate::analysis::dataflow::SolverKind;
use crate::analysis::live_variables::compute_live_variables;
use crate::prelude::*;
use crate::utils::log::{Finding, LogMessage};
use crate::AnalysisContext;
use itertools::Itertools;

const VERSION: &str = "0.1";

/// The module name and version
pub static ANALYSIS_MODULE: crate::AnalysisModule = crate::AnalysisModule {
    name: "livevar",
    version: VERSION,
    run: report_live_variables,
};

/// The configuration of the module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Config {
    /// The fixpoint strategy.
    #[serde(default)]
    pub solver: SolverKind,
}

/// Compute the live variables of all methods with a body.
pub fn report_live_variables(context: &AnalysisContext, params: &serde_json::Value) -> (Vec<LogMessage>, Vec<Finding>) {
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
        let result = compute_live_variables(&cfg, config.solver);
        let other: Vec<Vec<String>> = (0..method.body.len())
            .filter_map(|index| {
                let live_after = result.get_out_fact(cfg.node_of(index)?)?;
                Some(
                    std::iter::once(index.to_string())
                        .chain(live_after.iter().map(|var| var.name.clone()))
                        .collect::<Vec<String>>(),
                )
            })
            .collect();
        let live_at_start = cfg
            .node_of(0)
            .and_then(|node| result.get_in_fact(node))
            .map(|fact| fact.iter().map(|var| &var.name).join(", "))
            .unwrap_or_default();
        findings.push(
            Finding::new(
                ANALYSIS_MODULE.name,
                ANALYSIS_MODULE.version,
                format!("Live variables of {} (live on entry: {{{}}})", method, live_at_start),
            )
            .method(method.get_ref())
            .other(other),
        );
    }
    (Vec::new(), findings)
}

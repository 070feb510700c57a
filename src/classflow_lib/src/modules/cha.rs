/*!
This module builds the call graph of the program with class hierarchy analysis (CHA).

Starting from the entry method of the program (the configured entry method or the unique static `main` method)
all reachable methods are collected and the targets of each call site are resolved:
* static calls target the method declared in the named class,
* special calls target the method the named class dispatches to,
* virtual and interface calls target the methods that the named class and all its subtypes dispatch to.

For each reachable method one finding is generated.
Its `other` field contains one entry per resolved call edge:
the index of the call site, the kind of the call and the called method.

Configuration:
* `report_unresolved_calls`: also generate a finding for each call site without any resolved target.
*/
use super::parse_config;
use crate::analysis::callgraph::build_cha_call_graph;
use crate::prelude::*;
use crate::utils::log::{Finding, LogMessage};
use crate::AnalysisContext;

const VERSION: &str = "0.1";

/// The module name and version
pub static ANALYSIS_MODULE: crate::AnalysisModule = crate::AnalysisModule {
    name: "cha",
    version: VERSION,
    run: report_call_graph,
};

/// The configuration of the module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Config {
    /// Generate findings for call sites without resolved targets.
    #[serde(default)]
    pub report_unresolved_calls: bool,
}

/// Build the call graph and report its edges.
pub fn report_call_graph(
    context: &AnalysisContext,
    params: &serde_json::Value,
) -> (Vec<LogMessage>, Vec<Finding>) {
    let config: Config = match parse_config(params) {
        Ok(config) => config,
        Err(err) => {
            return (
                vec![LogMessage::new_error(format!("{:#}", err)).source(ANALYSIS_MODULE.name)],
                Vec::new(),
            )
        }
    };
    let entry = match context.entry_method() {
        Some(entry) => entry,
        None => {
            return (
                vec![LogMessage::new_error("No entry method found.").source(ANALYSIS_MODULE.name)],
                Vec::new(),
            )
        }
    };
    let (call_graph, mut logs) = build_cha_call_graph(context.hierarchy, entry);
    logs.push(
        LogMessage::new_info(format!(
            "Call graph with {} reachable methods and {} edges.",
            call_graph.reachable_methods().count(),
            call_graph.edge_count()
        ))
        .source(ANALYSIS_MODULE.name),
    );

    let mut findings = Vec::new();
    for method in call_graph.reachable_methods() {
        let method_ref = method.get_ref();
        let mut edges = Vec::new();
        for (call_site, invoke) in method.call_sites() {
            let callees = call_graph.get_callees_of_call_site(&method_ref, call_site);
            if callees.is_empty() && config.report_unresolved_calls {
                findings.push(
                    Finding::new(
                        ANALYSIS_MODULE.name,
                        ANALYSIS_MODULE.version,
                        format!(
                            "(Unresolved Call) No target found for the call of {} at statement {} of {}",
                            invoke.method_ref, call_site, method
                        ),
                    )
                    .method(method_ref.clone())
                    .statements(vec![call_site]),
                );
            }
            for callee in callees {
                edges.push(vec![
                    call_site.to_string(),
                    invoke.kind.to_string(),
                    callee.to_string(),
                ]);
            }
        }
        findings.push(
            Finding::new(
                ANALYSIS_MODULE.name,
                ANALYSIS_MODULE.version,
                format!("{} calls {} methods", method, call_graph.get_callees_of(&method_ref).len()),
            )
            .method(method_ref)
            .other(edges),
        );
    }
    (logs, findings)
}

/*!
This module runs the interprocedural constant propagation on the call graph of the program.

Compared to the intraprocedural constant propagation,
values of arguments flow into the parameters of the called methods
and returned values flow back to the result variables of the call sites.
All calling contexts of a method are merged.

The module reports
* parameters holding the same constant at the start of a method for all calls of it,
* call sites whose result variable holds the same constant after every return.

Configuration:
* `report_constant_returns`: whether call sites returning constants are reported.
*/
use super::parse_config;
use crate::abstract_domain::{AbstractDomain, Value};
use crate::analysis::callgraph::build_cha_call_graph;
use crate::analysis::interprocedural::constant_propagation::compute_inter_constants;
use crate::prelude::*;
use crate::utils::log::{Finding, LogMessage};
use crate::AnalysisContext;

const VERSION: &str = "0.1";

/// The module name and version
pub static ANALYSIS_MODULE: crate::AnalysisModule = crate::AnalysisModule {
    name: "inter-constprop",
    version: VERSION,
    run: report_inter_constants,
};

/// The configuration of the module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Config {
    /// Report call sites whose result is constant.
    #[serde(default = "default_true")]
    pub report_constant_returns: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            report_constant_returns: true,
        }
    }
}

/// Run the interprocedural constant propagation and report constant parameters and call results.
pub fn report_inter_constants(
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
    let (call_graph, logs) = build_cha_call_graph(context.hierarchy, entry);
    let (icfg, result) = compute_inter_constants(&call_graph);

    let mut findings = Vec::new();
    for method in icfg.methods() {
        let method_ref = method.get_ref();
        let parameter_fact = icfg
            .get_entry_of(&method_ref)
            .and_then(|entry| result.get_out_fact(entry));
        if let Some(fact) = parameter_fact {
            for param in method.params.iter() {
                if let Value::Constant(value) = fact.get(param) {
                    findings.push(
                        Finding::new(
                            ANALYSIS_MODULE.name,
                            ANALYSIS_MODULE.version,
                            format!("(Constant Parameter) {} of {} is always {}", param, method, value),
                        )
                        .method(method_ref.clone())
                        .other(vec![vec![param.name.clone(), value.to_string()]]),
                    );
                }
            }
        }
        if !config.report_constant_returns {
            continue;
        }
        for (call_site, invoke) in method.call_sites() {
            let result_var = match &invoke.result {
                Some(var) => var,
                None => continue,
            };
            let return_site_facts: Vec<_> = icfg
                .node_of(&method_ref, call_site)
                .into_iter()
                .flat_map(|node| icfg.get_succs_of(node).collect::<Vec<_>>())
                .filter(|succ| std::ptr::eq(icfg.get_containing_method_of(*succ), method))
                .filter_map(|succ| result.get_in_fact(succ))
                .collect();
            let value = return_site_facts
                .iter()
                .map(|fact| fact.get(result_var))
                .reduce(|acc, value| acc.meet(&value));
            if let Some(Value::Constant(value)) = value {
                findings.push(
                    Finding::new(
                        ANALYSIS_MODULE.name,
                        ANALYSIS_MODULE.version,
                        format!(
                            "(Constant Return) The call of {} at statement {} of {} always returns {}",
                            invoke.method_ref, call_site, method, value
                        ),
                    )
                    .method(method_ref.clone())
                    .statements(vec![call_site])
                    .other(vec![vec![result_var.name.clone(), value.to_string()]]),
                );
            }
        }
    }
    (logs, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intermediate_representation::*;
    use crate::stmts;

    #[test]
    fn constant_parameters_and_returns() {
        let program = Program::mock(
            vec![Class::mock(
                "A",
                None,
                vec![
                    Method {
                        is_static: true,
                        ..Method::mock(
                            "A",
                            "void run()",
                            &[],
                            stmts![
                                "x = 4",
                                "y = invokestatic <A: int twice(int)>(x)",
                                "return"
                            ],
                        )
                    },
                    Method {
                        is_static: true,
                        ..Method::mock("A", "int twice(int)", &["p"], stmts!["r = p * 2", "return r"])
                    },
                ],
            )],
            Some(MethodRef::new("A", "void run()")),
        );
        let hierarchy = ProgramHierarchy::new(&program);
        let context = AnalysisContext::new(&program, &hierarchy);
        let (_, findings) = report_inter_constants(&context, &serde_json::Value::Null);
        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .any(|finding| finding.other == vec![vec!["p".to_string(), "4".to_string()]]));
        assert!(findings
            .iter()
            .any(|finding| finding.other == vec![vec!["y".to_string(), "8".to_string()]]));

        let (_, findings) = report_inter_constants(
            &context,
            &serde_json::json!({"report_constant_returns": false}),
        );
        assert_eq!(findings.len(), 1);
    }
}

/*!
The main library of classflow containing the dataflow analysis framework and all analysis modules.

# What is classflow

classflow is a static analyzer for programs of a class-based, single-inheritance object language
given in a three-address intermediate representation.
It consists of
* a generic fixpoint engine computing dataflow facts over the control flow graph of a method,
* a call graph builder resolving dynamic dispatch by class hierarchy analysis,
* an interprocedural extension connecting the per-method analyses along call sites
* and concrete analyses built on top of it:
live variables, constant propagation, dead code detection and interprocedural constant propagation.

# Usage

The analyzed program is read from a JSON file containing the serialized [`Program`](intermediate_representation::Program).
```sh
classflow PROGRAM.json
```
Use the `--help` command line option for more information.
One can modify the behaviour of each analysis module through a custom configuration file
given with the `--config` command line option.
Start by taking a look at the standard configuration file located at `src/classflow_lib/src/config.json`
and read the [module-specific documentation](crate::modules) for more details about each field.
*/

pub mod abstract_domain;
pub mod analysis;
pub mod intermediate_representation;
pub mod modules;
pub mod utils;

use intermediate_representation::{ClassHierarchy, Method, Program, ProgramHierarchy};
use utils::log::{Finding, LogMessage};

mod prelude {
    pub use serde::{Deserialize, Serialize};

    pub use anyhow::Context as _;
    pub use anyhow::{anyhow, Error};
}
use prelude::*;

/// The generic function signature for the main function of an analysis module
pub type AnalysisModuleFn =
    fn(&AnalysisContext, &serde_json::Value) -> (Vec<LogMessage>, Vec<Finding>);

/// A structure containing general information about an analysis module,
/// including the function to be called to run the analysis.
pub struct AnalysisModule {
    /// The name of the module.
    pub name: &'static str,
    /// The version number of the module.
    /// Should be incremented whenever significant changes are made to the module.
    pub version: &'static str,
    /// The function that executes the analysis and returns its findings.
    pub run: AnalysisModuleFn,
}

impl std::fmt::Display for AnalysisModule {
    /// Print the module name and its version number.
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, r#""{}": "{}""#, self.name, self.version)
    }
}

/// Get a list of all known analysis modules.
pub fn get_modules() -> Vec<&'static AnalysisModule> {
    vec![
        &crate::modules::livevar::ANALYSIS_MODULE,
        &crate::modules::constprop::ANALYSIS_MODULE,
        &crate::modules::deadcode::ANALYSIS_MODULE,
        &crate::modules::cha::ANALYSIS_MODULE,
        &crate::modules::inter_constprop::ANALYSIS_MODULE,
    ]
}

/// The read-only inputs shared by all analysis modules.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// The analyzed program.
    pub program: &'a Program,
    /// The class hierarchy of the program.
    pub hierarchy: &'a ProgramHierarchy<'a>,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new context for the given program and its class hierarchy.
    pub fn new(program: &'a Program, hierarchy: &'a ProgramHierarchy<'a>) -> AnalysisContext<'a> {
        AnalysisContext { program, hierarchy }
    }

    /// Get the entry method of the program, if it has one.
    pub fn entry_method(&self) -> Option<&'a Method> {
        let entry = self.program.main_method()?;
        self.hierarchy
            .get_declared_method(&entry.declaring_class, &entry.subsignature)
    }

    /// Iterate over all methods of the program that have a body.
    pub fn concrete_methods(&self) -> impl Iterator<Item = &'a Method> {
        self.program.methods().filter(|method| !method.is_abstract)
    }
}

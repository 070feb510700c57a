//! This crate defines the command line interface for classflow.
//! General documentation about classflow is contained in the [`classflow_lib`] crate.

extern crate classflow_lib; // Needed for the docstring-link to work

use anyhow::{anyhow, Context, Error};
use classflow_lib::intermediate_representation::{Program, ProgramHierarchy};
use classflow_lib::utils::get_default_config;
use classflow_lib::utils::log::{add_debug_log_statistics, print_all_messages};
use classflow_lib::{AnalysisContext, AnalysisModule};
use std::collections::HashSet;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
/// Run dataflow analyses on programs of a class-based object language
struct CmdlineArgs {
    /// The path to the JSON file containing the program.
    #[structopt(required_unless("module-versions"), validator(check_file_existence))]
    program: Option<String>,

    /// Path to a custom configuration file to use instead of the standard one.
    #[structopt(long, short, validator(check_file_existence))]
    config: Option<String>,

    /// Write the results to a file instead of stdout.
    /// This only affects findings. Log messages are still printed to stdout.
    #[structopt(long, short)]
    out: Option<String>,

    /// Specify a specific set of analyses to be run as a comma separated list, e.g. 'livevar,deadcode'.
    ///
    /// Use the "--module-versions" command line option to get a list of all valid module names.
    #[structopt(long, short)]
    partial: Option<String>,

    /// Generate JSON output.
    #[structopt(long, short)]
    json: bool,

    /// Do not print log messages. This prevents polluting stdout for json output.
    #[structopt(long, short)]
    quiet: bool,

    /// Prints out the version numbers of all known modules.
    #[structopt(long)]
    module_versions: bool,
}

fn main() -> Result<(), Error> {
    let cmdline_args = CmdlineArgs::from_args();

    run(cmdline_args)
}

/// Check the existence of a file
fn check_file_existence(file_path: String) -> Result<(), String> {
    if std::fs::metadata(&file_path)
        .map_err(|err| format!("{}", err))?
        .is_file()
    {
        Ok(())
    } else {
        Err(format!("{} is not a file.", file_path))
    }
}

/// Run the selected analysis modules on the given program.
fn run(args: CmdlineArgs) -> Result<(), Error> {
    let mut modules = classflow_lib::get_modules();
    if args.module_versions {
        // Only print the module versions and then quit.
        println!("[classflow] module_versions:");
        for module in modules.iter() {
            println!("{}", module);
        }
        return Ok(());
    }

    // Get the configuration file
    let config: serde_json::Value = if let Some(config_path) = args.config {
        let file = std::io::BufReader::new(std::fs::File::open(config_path)?);
        serde_json::from_reader(file).context("Parsing of the configuration file failed")?
    } else {
        get_default_config()?
    };

    // Filter the modules to be executed if the `--partial` parameter is set.
    if let Some(ref partial_module_list) = args.partial {
        filter_modules_for_partial_run(&mut modules, partial_module_list)?;
    }

    let program_path = args
        .program
        .ok_or_else(|| anyhow!("No program file given"))?;
    let program_json = std::fs::read_to_string(&program_path)
        .with_context(|| format!("Could not read from file path {}", program_path))?;
    let program = Program::from_json(&program_json)?;
    let hierarchy = ProgramHierarchy::new(&program);
    let context = AnalysisContext::new(&program, &hierarchy);

    // Execute the modules and collect their logs and findings.
    let mut all_logs = Vec::new();
    let mut all_findings = Vec::new();
    for module in modules {
        let (mut logs, mut findings) = (module.run)(&context, &config[module.name]);
        all_logs.append(&mut logs);
        all_findings.append(&mut findings);
    }
    add_debug_log_statistics(&mut all_logs);

    // Print the results of the modules.
    if args.quiet {
        all_logs = Vec::new(); // Suppress all log messages since the `--quiet` flag is set.
    }
    print_all_messages(all_logs, all_findings, args.out.as_deref(), args.json)
}

/// Only keep the modules specified by the `--partial` parameter in the `modules` list.
/// The parameter is a comma-separated list of module names, e.g. 'livevar,deadcode'.
fn filter_modules_for_partial_run(
    modules: &mut Vec<&AnalysisModule>,
    partial_param: &str,
) -> Result<(), Error> {
    let module_names: HashSet<&str> = partial_param.split(',').collect();
    let mut selected = Vec::new();
    for module in modules.iter() {
        if module_names.contains(module.name) {
            selected.push(*module);
        }
    }
    for module_name in module_names {
        if !module_name.is_empty() && !modules.iter().any(|module| module.name == module_name) {
            return Err(anyhow!("{} is not a valid module name.", module_name));
        }
    }
    *modules = selected;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_run_keeps_module_order() {
        let mut modules = classflow_lib::get_modules();
        filter_modules_for_partial_run(&mut modules, "deadcode,livevar,").unwrap();
        let names: Vec<&str> = modules.iter().map(|module| module.name).collect();
        assert_eq!(names, vec!["livevar", "deadcode"]);

        let mut modules = classflow_lib::get_modules();
        assert!(filter_modules_for_partial_run(&mut modules, "livevar,unknown").is_err());
    }
}

//! Structs and functions for generating log messages and analysis findings.

use crate::intermediate_representation::MethodRef;
use crate::prelude::*;
use std::collections::BTreeMap;

/// A result reported by an analysis module.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord, Default)]
pub struct Finding {
    /// The name of the analysis module that generated the finding, e.g. `deadcode`.
    pub name: String,
    /// The version number of the module.
    pub version: String,
    /// The method the finding belongs to.
    pub method: Option<MethodRef>,
    /// Indices of the statements of the method associated to the finding.
    pub statements: Vec<usize>,
    /// Other useful information. Content depends on the module that generated the finding.
    pub other: Vec<Vec<String>>,
    /// A short description of the finding that is presented to the user.
    pub description: String,
}

impl Finding {
    /// Creates a new finding by only setting name, version and description
    pub fn new(name: impl ToString, version: impl ToString, description: impl ToString) -> Finding {
        Finding {
            name: name.to_string(),
            version: version.to_string(),
            method: None,
            statements: Vec::new(),
            other: Vec::new(),
            description: description.to_string(),
        }
    }

    /// Sets the method field of the finding
    pub fn method(mut self, method: MethodRef) -> Finding {
        self.method = Some(method);
        self
    }

    /// Sets the statements field of the finding
    pub fn statements(mut self, statements: Vec<usize>) -> Finding {
        self.statements = statements;
        self
    }

    /// Sets the other field of the finding
    pub fn other(mut self, other: Vec<Vec<String>>) -> Finding {
        self.other = other;
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "[{}] ({}) {}",
            self.name, self.version, self.description
        )
    }
}

/// A program point: a method and optionally the index of a statement in it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct Location {
    /// The method.
    pub method: MethodRef,
    /// The index of the statement inside the method body.
    pub stmt: Option<usize>,
}

impl Location {
    /// The location of the whole method.
    pub fn method(method: MethodRef) -> Location {
        Location { method, stmt: None }
    }

    /// The location of a statement of a method.
    pub fn stmt(method: MethodRef, index: usize) -> Location {
        Location {
            method,
            stmt: Some(index),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stmt {
            Some(index) => write!(formatter, "{}#{}", self.method, index),
            None => write!(formatter, "{}", self.method),
        }
    }
}

/// A generic log message.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct LogMessage {
    /// The log message.
    pub text: String,
    /// The severity/type of the log message.
    pub level: LogLevel,
    /// The program point that the message is related to.
    pub location: Option<Location>,
    /// The analysis where the message originated.
    pub source: Option<String>,
}

impl LogMessage {
    /// Create a new `Info`-level log message
    pub fn new_info(text: impl Into<String>) -> LogMessage {
        LogMessage {
            text: text.into(),
            level: LogLevel::Info,
            location: None,
            source: None,
        }
    }

    /// Create a new `Debug`-level log message
    pub fn new_debug(text: impl Into<String>) -> LogMessage {
        LogMessage {
            text: text.into(),
            level: LogLevel::Debug,
            location: None,
            source: None,
        }
    }

    /// Create a new `Error`-level log message
    pub fn new_error(text: impl Into<String>) -> LogMessage {
        LogMessage {
            text: text.into(),
            level: LogLevel::Error,
            location: None,
            source: None,
        }
    }

    /// Associate a specific location to the log message.
    pub fn location(mut self, location: Location) -> LogMessage {
        self.location = Some(location);
        self
    }

    /// Set the name of the source analysis for the log message.
    pub fn source(mut self, source: impl Into<String>) -> LogMessage {
        self.source = Some(source.into());
        self
    }
}

/// The severity/type of a log message.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum LogLevel {
    /// Messages intended for debugging.
    Debug,
    /// Errors encountered during analysis.
    Error,
    /// Non-error messages intended for the user.
    Info,
}

impl std::fmt::Display for LogMessage {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            LogLevel::Debug => write!(formatter, "DEBUG: ")?,
            LogLevel::Error => write!(formatter, "ERROR: ")?,
            LogLevel::Info => write!(formatter, "INFO: ")?,
        };
        match (&self.source, &self.location) {
            (Some(source), Some(location)) => write!(formatter, "{} @ {}: ", source, location)?,
            (Some(source), None) => write!(formatter, "{}: ", source)?,
            (None, Some(location)) => write!(formatter, "{}: ", location)?,
            (None, None) => (),
        };
        write!(formatter, "{}", self.text)
    }
}

/// Print all provided log messages and findings.
///
/// Log messages will always be printed to `stdout`.
/// Findings will either be printed to `stdout` or to the file path provided in `out_path`.
///
/// If `emit_json` is set, the findings will be converted to json for the output.
pub fn print_all_messages(
    logs: Vec<LogMessage>,
    findings: Vec<Finding>,
    out_path: Option<&str>,
    emit_json: bool,
) -> Result<(), Error> {
    for log in logs {
        println!("{}", log);
    }
    let output: String = if emit_json {
        serde_json::to_string_pretty(&findings)?
    } else {
        findings
            .iter()
            .map(|finding| format!("{}\n", finding))
            .collect()
    };
    if let Some(file_path) = out_path {
        std::fs::write(file_path, output)
            .with_context(|| format!("Writing to output path {} failed", file_path))?;
    } else {
        print!("{}", output);
    }
    Ok(())
}

/// For each analysis count the number of debug log messages in `all_logs`
/// and add a (INFO level) log message with the resulting number to `all_logs`.
/// Also count and log the number of general debug log messages.
pub fn add_debug_log_statistics(all_logs: &mut Vec<LogMessage>) {
    let mut analysis_debug_log_count = BTreeMap::new();
    let mut general_debug_log_count = 0u64;
    for log in all_logs.iter().filter(|log| log.level == LogLevel::Debug) {
        if let Some(analysis) = &log.source {
            analysis_debug_log_count
                .entry(analysis.clone())
                .and_modify(|count| *count += 1)
                .or_insert(1u64);
        } else {
            general_debug_log_count += 1;
        }
    }
    for (analysis, count) in analysis_debug_log_count {
        all_logs.push(LogMessage {
            text: format!("Logged {} debug log messages.", count),
            level: LogLevel::Info,
            location: None,
            source: Some(analysis),
        });
    }
    if general_debug_log_count > 0 {
        all_logs.push(LogMessage {
            text: format!(
                "Logged {} general debug log messages.",
                general_debug_log_count
            ),
            level: LogLevel::Info,
            location: None,
            source: None,
        });
    }
}

//! Compile filters and run them against JSON input

use super::CliError;
use crate::{Evaluator, Predicate, PredicateVisitor, Schema, VisitorConfig};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression
    pub query: String,
    /// Entity model the filter is compiled against
    pub schema: Schema,
    /// Root entity selectors start from
    pub entity: String,
    /// Allow-list, aliases, and wildcard mode
    pub config: VisitorConfig,
    /// JSON input: an array of records or a single record
    pub input: Option<String>,
    /// Only compile, don't execute
    pub compile_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// The filter compiled
    Compiled(Predicate),
    /// The filter compiled and selected these records
    Matched {
        predicate: Predicate,
        records: Vec<serde_json::Value>,
    },
}

/// Split an `external=internal` alias argument.
pub fn parse_alias(arg: &str) -> Result<(String, String), CliError> {
    match arg.split_once('=') {
        Some((external, internal)) if !external.is_empty() && !internal.is_empty() => {
            Ok((external.to_string(), internal.to_string()))
        }
        _ => Err(CliError::InvalidAlias(arg.to_string())),
    }
}

/// Execute a fiql check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let visitor = PredicateVisitor::new(&options.schema, options.entity.as_str());
    let predicate = visitor.compile(&options.query, &options.config)?;

    if options.compile_only {
        return Ok(CheckResult::Compiled(predicate));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = match serde_json::from_str(json_str)? {
        serde_json::Value::Array(records) => records,
        record => vec![record],
    };

    let matched = Evaluator::new()
        .filter(&predicate, &records)?
        .into_iter()
        .cloned()
        .collect();

    Ok(CheckResult::Matched {
        predicate,
        records: matched,
    })
}

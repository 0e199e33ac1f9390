//! CLI support for fiql-predicate
//!
//! Provides programmatic access to the fiql CLI functionality for embedding
//! in other tools.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check, parse_alias};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::{CompileError, ConfigError, ExecutionError, model::SchemaError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("invalid alias '{0}', expected external=internal")]
    InvalidAlias(String),

    #[error("unknown category: '{0}'\nRun 'fiql docs' to see available categories.")]
    UnknownCategory(String),
}

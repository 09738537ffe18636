//! CLI support for ccl-lang
//!
//! Provides programmatic access to the `ccl` command-line functionality so
//! other tools can embed it.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check, parse_error_policy};
pub use convert::{json_to_table, json_to_value, table_to_json, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Compile error: {0}")]
    Compile(#[from] crate::CompileError),

    #[error("Evaluation error: {0}")]
    Table(#[from] crate::TableError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe a JSON dataset to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'ccl docs' to see available categories.")]
    UnknownCategory(String),
}

//! Compile formulas and run them against JSON datasets

use super::{CliError, json_to_table, table_to_json};
use crate::{ErrorPolicy, EvalOptions, compile_expression, compile_multiline};

/// Options for the check and eval commands
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The formula or script to run
    pub formula: String,
    /// JSON dataset string
    pub input: Option<String>,
    /// Name of the derived column (expression mode)
    pub name: String,
    /// Treat the formula as a multi-statement script
    pub script: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    pub eval: EvalOptions,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            formula: String::new(),
            input: None,
            name: "result".to_string(),
            script: false,
            syntax_only: false,
            eval: EvalOptions::default(),
        }
    }
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Formula ran; the resulting dataset
    Success(serde_json::Value),
}

/// Parse an `--on-error` value
pub fn parse_error_policy(s: &str) -> Result<ErrorPolicy, String> {
    match s.to_ascii_lowercase().as_str() {
        "abort" => Ok(ErrorPolicy::Abort),
        "nil" => Ok(ErrorPolicy::Nil),
        other => Err(format!("expected 'abort' or 'nil', got '{}'", other)),
    }
}

/// Execute a ccl check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        if options.script {
            compile_multiline(&options.formula)?;
        } else {
            compile_expression(&options.formula)?;
        }
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let doc: serde_json::Value = serde_json::from_str(json_str)?;
    let mut table = json_to_table(doc)?;

    if options.script {
        table.execute_script(&options.formula, &options.eval)?;
    } else {
        table.add_calculated_column(&options.name, &options.formula, &options.eval)?;
    }

    Ok(CheckResult::Success(table_to_json(&table)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_only_reports_parse_errors() {
        let options = CheckOptions {
            formula: "A +".to_string(),
            syntax_only: true,
            ..Default::default()
        };
        assert!(matches!(execute_check(&options), Err(CliError::Compile(_))));
    }

    #[test]
    fn policy_names() {
        assert_eq!(parse_error_policy("NIL"), Ok(ErrorPolicy::Nil));
        assert!(parse_error_policy("skip").is_err());
    }
}

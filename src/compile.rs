//! Text-to-tree entry points.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    ast::{Expr, Statement},
    lexer::{LexError, Lexer, Position},
    parser::{ParseError, Parser},
    script::split_statements,
};

/// Failure to turn formula text into a syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A statement of a multi-statement script failed; `line` is the
    /// 1-based statement number after splitting.
    #[error("Statement {line} ('{text}'): {source}")]
    Statement {
        line: usize,
        text: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Offset of the offending character within its statement text.
    pub fn position(&self) -> Position {
        match self {
            CompileError::Lex(e) => e.position(),
            CompileError::Parse(e) => e.position(),
            CompileError::Statement { source, .. } => source.position(),
        }
    }
}

/// Compiles a bare expression. Assignment and `NEW(...)` are rejected.
///
/// ```
/// use ccl_lang::compile_expression;
///
/// assert!(compile_expression("A * 2 + B").is_ok());
/// assert!(compile_expression("B = A * 2").is_err());
/// ```
#[instrument(name = "ccl::compile_expression", level = "debug", err)]
pub fn compile_expression(text: &str) -> Result<Expr, CompileError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    Ok(parser.parse()?)
}

/// Compiles one statement: a bare expression, an assignment or a
/// new-column statement.
#[instrument(name = "ccl::compile_statement", level = "debug", err)]
pub fn compile_statement(text: &str) -> Result<Statement, CompileError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    Ok(parser.parse_statement()?)
}

/// Splits a script on `;` and newlines outside string literals and compiles
/// every non-empty piece as a statement, preserving order.
#[instrument(name = "ccl::compile_multiline", level = "debug", skip(script), err)]
pub fn compile_multiline(script: &str) -> Result<Vec<Statement>, CompileError> {
    let pieces = split_statements(script);
    debug!(statements = pieces.len(), "split script");

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            compile_statement(text).map_err(|e| CompileError::Statement {
                line: i + 1,
                text: text.to_string(),
                source: Box::new(e),
            })
        })
        .collect()
}

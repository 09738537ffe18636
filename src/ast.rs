//! # Column Calculation Language - Abstract Syntax Tree
//!
//! This module defines the syntax tree for CCL, a small formula language used
//! to derive one column of a dataset from the other columns of the same row.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, references, operations, calls)
//! - **[operators]** - Binary operators (comparison, arithmetic, concatenation, logical)
//! - **[statements]** - Statement forms (expression, assignment, new column)
//!
//! ## Quick Start
//!
//! ```text
//! IF(A > 100, 'High', 'Low')
//! ```
//!
//! For each row, yields `High` when the first column exceeds 100.
//!
//! ## Column References
//!
//! - **Letters** `A`, `B`, ..., `Z`, `AA` - positional, spreadsheet style
//! - **Names** `price` or `[Unit Price]` - looked up in the dataset's schema
//! - **Index** `#3` - positional, zero-based
//!
//! A letter sequence always wins over a column that happens to share its name.
//!
//! ## Precedence (low to high)
//!
//! ```text
//! ||    &&    == != < <= > >=    &    + -    * /    unary -
//! ```
//!
//! Comparisons at the same level chain: `0 <= A <= 100` means
//! `(0 <= A) && (A <= 100)` with `A` evaluated once.
//!
//! ## Statements
//!
//! ```text
//! B = A * 2                 // overwrite column B
//! NEW('total') = A + B      // create column "total"
//! ```
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod tokens;

pub use expressions::Expr;
pub use operators::BinOp;
pub use statements::Statement;
pub use tokens::{Spanned, Token};

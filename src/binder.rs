//! Resolves column references against a dataset schema.
//!
//! Resolution order for identifiers and bracketed names:
//!
//! 1. A spreadsheet letter sequence (`A`, `Z`, `AA`) resolves to its
//!    zero-based position, even when another column carries that name.
//! 2. Otherwise the text is looked up in the schema's names.
//! 3. Otherwise binding fails with [`BindError::NameResolution`].
//!
//! Every reference must land inside the schema's width, so a formula that
//! binds never reads a column the dataset does not have.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::instrument;

use crate::{
    ast::{Expr, Statement},
    schema::Schema,
};

static COLUMN_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+$").expect("letter pattern is valid"));

/// A referenced column could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("Unknown column '{0}'")]
    NameResolution(String),

    #[error("Column index #{index} out of range: dataset has {width} columns")]
    IndexOutOfRange { index: usize, width: usize },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),
}

/// Zero-based index of a spreadsheet column letter sequence.
///
/// `A` is 0, `Z` is 25, `AA` is 26. Returns `None` for anything that is not
/// an uppercase ASCII letter run, or that overflows.
///
/// ```
/// use ccl_lang::binder::column_letter_index;
///
/// assert_eq!(column_letter_index("A"), Some(0));
/// assert_eq!(column_letter_index("AB"), Some(27));
/// assert_eq!(column_letter_index("price"), None);
/// ```
pub fn column_letter_index(text: &str) -> Option<usize> {
    if !COLUMN_LETTERS.is_match(text) {
        return None;
    }
    let mut index: usize = 0;
    for ch in text.bytes() {
        index = index
            .checked_mul(26)?
            .checked_add(usize::from(ch - b'A') + 1)?;
    }
    Some(index - 1)
}

/// An expression whose column references are all resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpr {
    expr: Expr,
}

impl BoundExpr {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Indexes of every column the expression reads, in first-seen order.
    pub fn columns(&self) -> Vec<usize> {
        let mut out = Vec::new();
        collect_columns(&self.expr, &mut out);
        out
    }
}

fn collect_columns(expr: &Expr, out: &mut Vec<usize>) {
    match expr {
        Expr::Column { index, .. } => {
            if !out.contains(index) {
                out.push(*index);
            }
        }
        Expr::BinaryOp { left, right, .. } => {
            collect_columns(left, out);
            collect_columns(right, out);
        }
        Expr::Chain { operands, .. } => operands.iter().for_each(|e| collect_columns(e, out)),
        Expr::Call { args, .. } => args.iter().for_each(|e| collect_columns(e, out)),
        Expr::Number(_)
        | Expr::String(_)
        | Expr::Boolean(_)
        | Expr::Nil
        | Expr::Identifier(_)
        | Expr::ColumnIndex(_)
        | Expr::ColumnName(_) => {}
    }
}

/// A statement ready for per-row evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    Expression(BoundExpr),
    Assign {
        index: usize,
        name: String,
        value: BoundExpr,
    },
    NewColumn {
        name: String,
        value: BoundExpr,
    },
}

impl BoundStatement {
    pub fn value(&self) -> &BoundExpr {
        match self {
            BoundStatement::Expression(value)
            | BoundStatement::Assign { value, .. }
            | BoundStatement::NewColumn { value, .. } => value,
        }
    }
}

struct Binder<'a> {
    schema: &'a Schema,
}

impl Binder<'_> {
    fn resolve_name(&self, name: &str) -> Result<Expr, BindError> {
        let index = column_letter_index(name)
            .or_else(|| self.schema.lookup(name))
            .filter(|index| *index < self.schema.width())
            .ok_or_else(|| BindError::NameResolution(name.to_string()))?;
        Ok(self.column(index, name))
    }

    fn resolve_index(&self, index: usize) -> Result<Expr, BindError> {
        if index >= self.schema.width() {
            return Err(BindError::IndexOutOfRange {
                index,
                width: self.schema.width(),
            });
        }
        Ok(self.column(index, &format!("#{}", index)))
    }

    /// Display name is the schema's name when the column has one.
    fn column(&self, index: usize, written: &str) -> Expr {
        let name = match self.schema.name_of(index) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => written.to_string(),
        };
        Expr::Column { index, name }
    }

    fn bind_expr(&self, expr: &Expr) -> Result<Expr, BindError> {
        match expr {
            Expr::Number(n) => Ok(Expr::Number(*n)),
            Expr::String(s) => Ok(Expr::String(s.clone())),
            Expr::Boolean(b) => Ok(Expr::Boolean(*b)),
            Expr::Nil => Ok(Expr::Nil),
            Expr::Identifier(name) | Expr::ColumnName(name) => self.resolve_name(name),
            Expr::ColumnIndex(index) => self.resolve_index(*index),
            // Already resolved against some schema; re-check it fits this one
            Expr::Column { index, .. } => self.resolve_index(*index),
            Expr::BinaryOp { op, left, right } => Ok(Expr::BinaryOp {
                op: *op,
                left: Box::new(self.bind_expr(left)?),
                right: Box::new(self.bind_expr(right)?),
            }),
            Expr::Chain {
                operands,
                operators,
            } => Ok(Expr::Chain {
                operands: operands
                    .iter()
                    .map(|e| self.bind_expr(e))
                    .collect::<Result<_, _>>()?,
                operators: operators.clone(),
            }),
            Expr::Call { name, args } => Ok(Expr::Call {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|e| self.bind_expr(e))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }
}

/// Resolves every column reference in `expr`.
#[instrument(name = "ccl::bind", level = "trace", skip_all, err)]
pub fn bind(expr: &Expr, schema: &Schema) -> Result<BoundExpr, BindError> {
    let expr = Binder { schema }.bind_expr(expr)?;
    Ok(BoundExpr { expr })
}

/// Resolves a statement. Assignment targets must exist; new-column names
/// must not.
#[instrument(name = "ccl::bind_statement", level = "trace", skip_all, err)]
pub fn bind_statement(statement: &Statement, schema: &Schema) -> Result<BoundStatement, BindError> {
    let binder = Binder { schema };
    match statement {
        Statement::Expression(expr) => Ok(BoundStatement::Expression(BoundExpr {
            expr: binder.bind_expr(expr)?,
        })),
        Statement::Assign { target, value } => {
            let (index, name) = match binder.bind_expr(target)? {
                Expr::Column { index, name } => (index, name),
                _ => return Err(BindError::NameResolution(format!("{:?}", target))),
            };
            Ok(BoundStatement::Assign {
                index,
                name,
                value: BoundExpr {
                    expr: binder.bind_expr(value)?,
                },
            })
        }
        Statement::NewColumn { name, value } => {
            if schema.lookup(name).is_some() {
                return Err(BindError::DuplicateColumn(name.clone()));
            }
            Ok(BoundStatement::NewColumn {
                name: name.clone(),
                value: BoundExpr {
                    expr: binder.bind_expr(value)?,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_indexes() {
        assert_eq!(column_letter_index("Z"), Some(25));
        assert_eq!(column_letter_index("AA"), Some(26));
        assert_eq!(column_letter_index("AZ"), Some(51));
        assert_eq!(column_letter_index("BA"), Some(52));
        assert_eq!(column_letter_index("a"), None);
        assert_eq!(column_letter_index("A1"), None);
        assert_eq!(column_letter_index(""), None);
    }

    #[test]
    fn letter_wins_over_name() {
        // column 1 is literally named "A"
        let schema = Schema::new(["x", "A"]);
        let bound = bind(&Expr::Identifier("A".into()), &schema).unwrap();
        assert_eq!(
            bound.expr(),
            &Expr::Column {
                index: 0,
                name: "x".into()
            }
        );
    }
}

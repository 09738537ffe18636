//! A bound multi-statement script.

use tracing::instrument;

use crate::{
    ast::Statement,
    binder::{BindError, BoundStatement, bind_statement},
    evaluator::{EvalError, Evaluator},
    schema::{RowView, Schema},
    value::Value,
};

/// Statements bound in order, each against the schema as left by the
/// statements before it, so a column created by `NEW(...)` can be read by
/// later statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<BoundStatement>,
    width: usize,
}

impl Program {
    #[instrument(name = "ccl::program::bind", level = "debug", skip_all, fields(statements = statements.len()), err)]
    pub fn bind(statements: &[Statement], schema: &Schema) -> Result<Self, BindError> {
        let mut schema = schema.clone();
        let mut bound = Vec::with_capacity(statements.len());

        for statement in statements {
            let statement = bind_statement(statement, &schema)?;
            if let BoundStatement::NewColumn { name, .. } = &statement {
                schema.push(name.clone());
            }
            bound.push(statement);
        }

        Ok(Program {
            statements: bound,
            width: schema.width(),
        })
    }

    pub fn statements(&self) -> &[BoundStatement] {
        &self.statements
    }

    /// Number of columns once every `NEW(...)` statement has run.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs every statement against one row, in order. Values produced by
    /// assignments and new columns are visible to the statements after them.
    ///
    /// Returns one value per statement.
    pub fn evaluate_row<R>(&self, evaluator: &Evaluator, row: &R) -> Result<Vec<Value>, EvalError>
    where
        R: RowView + ?Sized,
    {
        let mut overlay = Overlay::new(row, self.width);
        let mut next_new = self.width - self.new_columns();
        let mut outputs = Vec::with_capacity(self.statements.len());

        for statement in &self.statements {
            let value = evaluator.eval_statement(statement, &overlay)?;
            match statement {
                BoundStatement::Expression(_) => {}
                BoundStatement::Assign { index, .. } => overlay.set(*index, value.clone()),
                BoundStatement::NewColumn { .. } => {
                    overlay.set(next_new, value.clone());
                    next_new += 1;
                }
            }
            outputs.push(value);
        }
        Ok(outputs)
    }

    fn new_columns(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, BoundStatement::NewColumn { .. }))
            .count()
    }
}

/// Row view with per-column overrides layered over a base row.
struct Overlay<'a, R: ?Sized> {
    base: &'a R,
    overrides: Vec<Option<Value>>,
}

impl<'a, R: RowView + ?Sized> Overlay<'a, R> {
    fn new(base: &'a R, width: usize) -> Self {
        Overlay {
            base,
            overrides: vec![None; width],
        }
    }

    fn set(&mut self, index: usize, value: Value) {
        if index >= self.overrides.len() {
            self.overrides.resize(index + 1, None);
        }
        self.overrides[index] = Some(value);
    }
}

impl<R: RowView + ?Sized> RowView for Overlay<'_, R> {
    fn cell(&self, index: usize) -> Value {
        match self.overrides.get(index) {
            Some(Some(value)) => value.clone(),
            _ => self.base.cell(index),
        }
    }
}

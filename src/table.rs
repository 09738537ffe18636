//! Minimal in-memory column store that drives formula evaluation.
//!
//! Real datasets live outside this crate; `Table` is the reference consumer
//! of the compile → bind → evaluate pipeline, and is what the CLI runs on.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    binder::{BindError, BoundStatement, bind},
    compile::{CompileError, compile_expression, compile_multiline},
    evaluator::{EvalError, Evaluator},
    program::Program,
    schema::{RowView, Schema},
    value::Value,
};

/// What to do when a row fails to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the pass and report the first failing row
    #[default]
    Abort,
    /// Store nil for the failing row and continue
    Nil,
}

/// Options for one evaluation pass over a table.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalOptions {
    /// Evaluate rows on the rayon thread pool
    pub parallel: bool,
    /// Tables with fewer rows are evaluated sequentially
    pub min_parallel_rows: usize,
    pub on_error: ErrorPolicy,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            parallel: true,
            min_parallel_rows: 1024,
            on_error: ErrorPolicy::Abort,
        }
    }
}

impl EvalOptions {
    pub fn sequential() -> Self {
        EvalOptions {
            parallel: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Bind error: {0}")]
    Bind(#[from] BindError),

    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: EvalError,
    },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// Columns of possibly different lengths; missing cells read as nil.
///
/// # Examples
///
/// ```
/// use ccl_lang::{EvalOptions, Table, Value};
///
/// let mut table = Table::new();
/// table.push_column("price", vec![Value::from(10), Value::from(20)]);
/// table.push_column("qty", vec![Value::from(3), Value::Nil]);
///
/// table
///     .add_calculated_column("total", "price * qty", &EvalOptions::default())
///     .unwrap();
///
/// let total = table.column_by_name("total").unwrap();
/// assert_eq!(total.values, vec![Value::from(30), Value::from(0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<Column>) -> Self {
        Table { columns }
    }

    /// Appends a column and returns its index.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> usize {
        self.columns.push(Column::new(name, values));
        self.columns.len() - 1
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.schema().lookup(name).and_then(|i| self.columns.get(i))
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(|c| c.name.clone()))
    }

    pub fn row(&self, row: usize) -> TableRow<'_> {
        TableRow { table: self, row }
    }

    /// Evaluates a bare-expression formula for every row and appends the
    /// results as a new column. Returns the new column's index.
    #[instrument(name = "ccl::table::add_calculated_column", level = "debug", skip(self, options), err)]
    pub fn add_calculated_column(
        &mut self,
        name: &str,
        formula: &str,
        options: &EvalOptions,
    ) -> Result<usize, TableError> {
        if self.schema().lookup(name).is_some() {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }

        let expr = compile_expression(formula)?;
        let bound = bind(&expr, &self.schema())?;
        let evaluator = Evaluator::new();

        let values = self.run_rows(
            options,
            |row| evaluator.eval_expression(&bound, &row),
            || Value::Nil,
        )?;
        Ok(self.push_column(name, values))
    }

    /// Runs a multi-statement script. Statements take effect in order;
    /// bare expression statements are evaluated but change nothing.
    #[instrument(name = "ccl::table::execute_script", level = "debug", skip_all, err)]
    pub fn execute_script(&mut self, script: &str, options: &EvalOptions) -> Result<(), TableError> {
        let statements = compile_multiline(script)?;
        let program = Program::bind(&statements, &self.schema())?;
        let evaluator = Evaluator::new();
        let count = program.statements().len();

        let outputs = self.run_rows(
            options,
            |row| program.evaluate_row(&evaluator, &row),
            || vec![Value::Nil; count],
        )?;

        for (k, statement) in program.statements().iter().enumerate() {
            let column: Vec<Value> = outputs.iter().map(|row| row[k].clone()).collect();
            match statement {
                BoundStatement::Expression(_) => {}
                BoundStatement::Assign { index, .. } => self.columns[*index].values = column,
                BoundStatement::NewColumn { name, .. } => {
                    self.push_column(name.clone(), column);
                }
            }
        }
        Ok(())
    }

    /// Evaluates `eval` for every row, preserving row order. Under
    /// [`ErrorPolicy::Abort`] the lowest failing row is reported, in parallel
    /// mode too.
    fn run_rows<T, F, D>(&self, options: &EvalOptions, eval: F, fallback: D) -> Result<Vec<T>, TableError>
    where
        T: Send,
        F: Fn(TableRow<'_>) -> Result<T, EvalError> + Sync,
        D: Fn() -> T + Sync,
    {
        let rows = self.row_count();
        let parallel = options.parallel && rows >= options.min_parallel_rows;
        debug!(rows, parallel, "evaluating rows");

        let eval_one = |row: usize| -> Result<T, TableError> {
            match eval(self.row(row)) {
                Ok(value) => Ok(value),
                Err(source) => match options.on_error {
                    ErrorPolicy::Abort => Err(TableError::Row { row, source }),
                    ErrorPolicy::Nil => {
                        warn!(row, error = %source, "row failed, storing nil");
                        Ok(fallback())
                    }
                },
            }
        };

        if parallel {
            let results: Vec<Result<T, TableError>> =
                (0..rows).into_par_iter().map(eval_one).collect();
            results.into_iter().collect()
        } else {
            (0..rows).map(eval_one).collect()
        }
    }
}

/// One row of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    row: usize,
}

impl RowView for TableRow<'_> {
    fn cell(&self, index: usize) -> Value {
        self.table
            .columns
            .get(index)
            .and_then(|c| c.values.get(self.row))
            .cloned()
            .unwrap_or_default()
    }
}

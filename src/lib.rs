pub mod ast;
pub mod binder;
pub mod cli;
pub mod compile;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod schema;
pub mod script;
pub mod table;
pub mod value;

pub use ast::{BinOp, Expr, Statement, Token};
pub use binder::{BindError, BoundExpr, BoundStatement, bind, bind_statement};
pub use compile::{CompileError, compile_expression, compile_multiline, compile_statement};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use program::Program;
pub use schema::{RowView, Schema};
pub use table::{Column, ErrorPolicy, EvalOptions, Table, TableError};
pub use value::Value;

/// Evaluates a bound expression against one row.
///
/// ```
/// use ccl_lang::{Schema, Value, bind, compile_expression, evaluate};
///
/// let expr = compile_expression("'Value: ' & A").unwrap();
/// let bound = bind(&expr, &Schema::new(["x"])).unwrap();
/// assert_eq!(
///     evaluate(&bound, &vec![Value::Nil]).unwrap(),
///     Value::from("Value: <nil>")
/// );
/// ```
pub fn evaluate<R>(expr: &BoundExpr, row: &R) -> Result<Value, EvalError>
where
    R: RowView + ?Sized,
{
    Evaluator::new().eval_expression(expr, row)
}

use std::cmp::Ordering;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::{
    ast::{BinOp, Expr},
    binder::{BoundExpr, BoundStatement},
    functions::{self, Arity, Builtin},
    schema::RowView,
    value::Value,
};

/// Errors raised while evaluating a formula against one row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Operand of the wrong type for the operation
    #[error("Type error: {0}")]
    TypeError(String),

    /// Call to a name outside the built-in set
    #[error("Unknown function: {0}()")]
    UnknownFunction(String),

    /// Built-in called with the wrong number of arguments
    #[error("{name}() takes {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: Arity,
        got: usize,
    },

    /// Column reference that never went through the binder
    #[error("Unresolved column reference '{0}'")]
    Unbound(String),
}

/// Stateless row evaluator.
///
/// A bound formula and an evaluator can be shared across threads; every
/// call reads only the expression and the row it is given.
///
/// # Examples
///
/// ```
/// use ccl_lang::{Evaluator, Schema, Value, bind, compile_expression};
///
/// let expr = compile_expression("IF(A > 100, 'High', 'Low')").unwrap();
/// let bound = bind(&expr, &Schema::new(["amount"])).unwrap();
///
/// let evaluator = Evaluator::new();
/// let row = vec![Value::Number(150.0)];
/// assert_eq!(
///     evaluator.eval_expression(&bound, &row).unwrap(),
///     Value::Text("High".to_string())
/// );
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a bound expression against one row.
    pub fn eval_expression<R>(&self, expr: &BoundExpr, row: &R) -> Result<Value, EvalError>
    where
        R: RowView + ?Sized,
    {
        self.eval_expr(expr.expr(), row)
    }

    /// Evaluates the value side of a bound statement against one row. The
    /// caller decides where the result goes.
    pub fn eval_statement<R>(&self, statement: &BoundStatement, row: &R) -> Result<Value, EvalError>
    where
        R: RowView + ?Sized,
    {
        self.eval_expression(statement.value(), row)
    }

    fn eval_expr<R>(&self, expr: &Expr, row: &R) -> Result<Value, EvalError>
    where
        R: RowView + ?Sized,
    {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::Text(s.clone())),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Nil => Ok(Value::Nil),
            Expr::Column { index, .. } => Ok(row.cell(*index)),
            Expr::Identifier(name) | Expr::ColumnName(name) => {
                Err(EvalError::Unbound(name.clone()))
            }
            Expr::ColumnIndex(index) => Err(EvalError::Unbound(format!("#{}", index))),
            Expr::BinaryOp { op, left, right } => match op {
                BinOp::And => {
                    if !self.eval_bool(left, row, "&&")? {
                        return Ok(Value::Boolean(false));
                    }
                    Ok(Value::Boolean(self.eval_bool(right, row, "&&")?))
                }
                BinOp::Or => {
                    if self.eval_bool(left, row, "||")? {
                        return Ok(Value::Boolean(true));
                    }
                    Ok(Value::Boolean(self.eval_bool(right, row, "||")?))
                }
                _ => {
                    let left_val = self.eval_expr(left, row)?;
                    let right_val = self.eval_expr(right, row)?;
                    apply_binop(*op, &left_val, &right_val)
                }
            },
            Expr::Chain {
                operands,
                operators,
            } => self.eval_chain(operands, operators, row),
            Expr::Call { name, args } => self.eval_call(name, args, row),
        }
    }

    fn eval_bool<R>(&self, expr: &Expr, row: &R, context: &str) -> Result<bool, EvalError>
    where
        R: RowView + ?Sized,
    {
        expect_bool(&self.eval_expr(expr, row)?, context)
    }

    /// `a < b < c` is `(a < b) && (b < c)`; each operand is evaluated at most
    /// once and evaluation stops at the first failing pair.
    fn eval_chain<R>(&self, operands: &[Expr], operators: &[BinOp], row: &R) -> Result<Value, EvalError>
    where
        R: RowView + ?Sized,
    {
        let Some((first, rest)) = operands.split_first() else {
            return Ok(Value::Boolean(true));
        };

        let mut left = self.eval_expr(first, row)?;
        for (op, operand) in operators.iter().zip(rest) {
            let right = self.eval_expr(operand, row)?;
            if !comparison_holds(*op, &left, &right) {
                return Ok(Value::Boolean(false));
            }
            left = right;
        }
        Ok(Value::Boolean(true))
    }

    fn eval_call<R>(&self, name: &str, args: &[Expr], row: &R) -> Result<Value, EvalError>
    where
        R: RowView + ?Sized,
    {
        let builtin =
            Builtin::from_name(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        if !builtin.arity().accepts(args.len()) {
            return Err(EvalError::WrongArity {
                name: builtin.name().to_string(),
                expected: builtin.arity(),
                got: args.len(),
            });
        }

        if builtin.is_lazy() {
            return match builtin {
                Builtin::If => {
                    let branch = if self.eval_bool(&args[0], row, "IF condition")? {
                        &args[1]
                    } else {
                        &args[2]
                    };
                    self.eval_expr(branch, row)
                }
                Builtin::IfNil => {
                    let value = self.eval_expr(&args[0], row)?;
                    if value.is_nil() {
                        self.eval_expr(&args[1], row)
                    } else {
                        Ok(value)
                    }
                }
                _ => unreachable!("only IF and IFNIL are lazy"),
            };
        }

        let values = args
            .iter()
            .map(|arg| self.eval_expr(arg, row))
            .collect::<Result<Vec<_>, _>>()?;
        apply_builtin(builtin, &values)
    }
}

fn apply_builtin(builtin: Builtin, values: &[Value]) -> Result<Value, EvalError> {
    match builtin {
        Builtin::And => {
            let mut all = true;
            for v in values {
                all &= expect_bool(v, "AND")?;
            }
            Ok(Value::Boolean(all))
        }
        Builtin::Or => {
            let mut any = false;
            for v in values {
                any |= expect_bool(v, "OR")?;
            }
            Ok(Value::Boolean(any))
        }
        Builtin::Not => Ok(Value::Boolean(!expect_bool(&values[0], "NOT")?)),
        Builtin::IsNil => Ok(Value::Boolean(values[0].is_nil())),
        Builtin::Concat => Ok(functions::concat(values)),
        Builtin::Abs => Ok(Value::Number(arithmetic_operand(&values[0], "ABS")?.abs())),
        Builtin::Round => {
            let n = arithmetic_operand(&values[0], "ROUND")?;
            let digits = match values.get(1) {
                Some(d) => arithmetic_operand(d, "ROUND")?.trunc() as i32,
                None => 0,
            };
            Ok(Value::Number(functions::round_to(n, digits)))
        }
        Builtin::Len => Ok(functions::len(&values[0])),
        Builtin::Upper => Ok(functions::upper(&values[0])),
        Builtin::Lower => Ok(functions::lower(&values[0])),
        Builtin::If | Builtin::IfNil => unreachable!("lazy builtins are evaluated by the evaluator"),
    }
}

fn expect_bool(value: &Value, context: &str) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{} requires a boolean operand, got {} '{}'",
            context,
            value.type_name(),
            value
        ))
    })
}

/// Numeric view for arithmetic: nil is zero, numeric text is parsed.
fn arithmetic_operand(value: &Value, context: &str) -> Result<f64, EvalError> {
    match value {
        Value::Nil => Ok(0.0),
        Value::Number(n) => Ok(*n),
        Value::Text(s) => value.as_number().ok_or_else(|| {
            EvalError::TypeError(format!("Cannot use non-numeric text '{}' in {}", s, context))
        }),
        Value::Boolean(b) => Err(EvalError::TypeError(format!(
            "Cannot use boolean {} in {}",
            b, context
        ))),
    }
}

/// IEEE-754 arithmetic, replaced by the decimal result only when that one
/// agrees with it and prints shorter, so `0.1 + 0.2` yields `0.3` while
/// values below decimal precision keep their float result.
fn arithmetic(op: BinOp, a: f64, b: f64) -> f64 {
    let float = match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        _ => a / b,
    };

    match decimal_arithmetic(op, a, b) {
        Some(exact) if agrees(exact, float) && digits(exact) < digits(float) => exact,
        _ => float,
    }
}

fn decimal_arithmetic(op: BinOp, a: f64, b: f64) -> Option<f64> {
    let ad = exact_decimal(a)?;
    let bd = exact_decimal(b)?;
    let rd = match op {
        BinOp::Add => ad.checked_add(bd),
        BinOp::Subtract => ad.checked_sub(bd),
        BinOp::Multiply => ad.checked_mul(bd),
        BinOp::Divide => ad.checked_div(bd),
        _ => None,
    }?;
    rd.to_f64()
}

/// Decimal form of `n`, provided it converts back to the same float.
fn exact_decimal(n: f64) -> Option<Decimal> {
    let d = Decimal::from_f64(n)?;
    (d.to_f64() == Some(n)).then_some(d)
}

fn agrees(exact: f64, float: f64) -> bool {
    float.is_finite() && (exact - float).abs() <= float.abs() * 1e-12
}

/// Significant digits in the shortest round-trip form of `n`.
fn digits(n: f64) -> usize {
    let formatted = format!("{:e}", n);
    let mantissa = formatted.split('e').next().unwrap_or_default();
    mantissa.chars().filter(char::is_ascii_digit).count()
}

/// Applies a binary operator to two evaluated operands.
///
/// `&&` and `||` are accepted here without short-circuiting; the evaluator
/// itself short-circuits before reaching this point.
pub fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Divide => {
            let context = format!("'{}'", op.symbol());
            let a = arithmetic_operand(left, &context)?;
            let b = arithmetic_operand(right, &context)?;
            Ok(Value::Number(arithmetic(op, a, b)))
        }
        BinOp::Concat => Ok(Value::Text(format!("{}{}", left.render(), right.render()))),
        BinOp::Equal
        | BinOp::NotEqual
        | BinOp::LessThan
        | BinOp::GreaterThan
        | BinOp::LessEqual
        | BinOp::GreaterEqual => Ok(Value::Boolean(comparison_holds(op, left, right))),
        BinOp::And => Ok(Value::Boolean(
            expect_bool(left, "&&")? && expect_bool(right, "&&")?,
        )),
        BinOp::Or => Ok(Value::Boolean(
            expect_bool(left, "||")? || expect_bool(right, "||")?,
        )),
    }
}

fn comparison_holds(op: BinOp, left: &Value, right: &Value) -> bool {
    match op {
        BinOp::Equal => values_equal(left, right),
        BinOp::NotEqual => !values_equal(left, right),
        _ => ordering_holds(op, left, right),
    }
}

/// Equality: nil only equals nil; numbers and numeric text compare as
/// numbers; everything else compares by text form.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) | (_, Value::Nil) => false,
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => left.render() == right.render(),
        },
    }
}

/// Ordering: any nil operand fails the predicate, even nil against nil.
fn ordering_holds(op: BinOp, left: &Value, right: &Value) -> bool {
    if left.is_nil() || right.is_nil() {
        return false;
    }

    let ordering = match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(left.render().cmp(&right.render())),
    };

    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinOp::LessThan => ordering == Ordering::Less,
        BinOp::GreaterThan => ordering == Ordering::Greater,
        BinOp::LessEqual => ordering != Ordering::Greater,
        BinOp::GreaterEqual => ordering != Ordering::Less,
        _ => false,
    }
}

use crate::ast::BinOp;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// The parser only produces the unresolved reference shapes (`Identifier`,
/// `ColumnIndex`, `ColumnName`); `Column` is produced exclusively by the binder.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Literal number
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Number(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'hello'
    /// ```
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// Nil literal
    Nil,

    // References
    /// Unresolved bare identifier: a column letter or a column name
    ///
    /// # Example
    /// ```text
    /// A
    /// price
    /// ```
    Identifier(String),

    /// Unresolved positional reference
    ///
    /// # Example
    /// ```text
    /// #2
    /// ```
    ColumnIndex(usize),

    /// Unresolved bracketed column name
    ///
    /// # Example
    /// ```text
    /// [Unit Price]
    /// ```
    ColumnName(String),

    /// Resolved column reference
    Column { index: usize, name: String },

    // Operations
    /// Binary operation (arithmetic, concatenation, single comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Two or more comparisons at the same level
    ///
    /// `operators.len() == operands.len() - 1` always holds.
    ///
    /// # Example
    /// ```text
    /// 10 < A <= 20
    /// ```
    Chain {
        operands: Vec<Expr>,
        operators: Vec<BinOp>,
    },

    /// Built-in function call
    ///
    /// # Examples
    /// ```text
    /// IF(A > 100, 'High', 'Low')
    /// ROUND(A / 3, 2)
    /// ```
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    pub(crate) fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Height of the tree; a leaf has depth 1. Walks with an explicit stack
    /// so arbitrarily deep trees can be measured.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((expr, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match expr {
                Expr::BinaryOp { left, right, .. } => {
                    pending.push((left.as_ref(), depth + 1));
                    pending.push((right.as_ref(), depth + 1));
                }
                Expr::Chain { operands, .. } => {
                    pending.extend(operands.iter().map(|e| (e, depth + 1)));
                }
                Expr::Call { args, .. } => {
                    pending.extend(args.iter().map(|e| (e, depth + 1)));
                }
                _ => {}
            }
        }
        deepest
    }
}

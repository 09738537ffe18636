use crate::ast::Expr;

/// A single CCL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Bare expression, whose value becomes the derived column
    ///
    /// # Example
    /// ```text
    /// A * 1.1
    /// ```
    Expression(Expr),

    /// Overwrite an existing column row by row
    ///
    /// The target is one of the unresolved reference shapes of [`Expr`].
    ///
    /// # Example
    /// ```text
    /// B = A * 2
    /// [Unit Price] = [Unit Price] + 1
    /// ```
    Assign { target: Expr, value: Expr },

    /// Create a new column holding the value of the expression
    ///
    /// # Example
    /// ```text
    /// NEW('total') = A + B
    /// ```
    NewColumn { name: String, value: Expr },
}

impl Statement {
    pub fn is_expression(&self) -> bool {
        matches!(self, Statement::Expression(_))
    }
}

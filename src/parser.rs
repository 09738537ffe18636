use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{BinOp, Expr, Spanned, Statement, Token},
    lexer::{LexError, Lexer, Position},
};

/// Grammar violations found while building the syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("Missing operand: expected an expression, got {found} at {position}")]
    MissingOperand { found: String, position: Position },

    #[error("Unmatched parenthesis at {position}")]
    UnmatchedParen { position: Position },

    #[error("Unexpected {found} after end of expression at {position}")]
    TrailingTokens { found: String, position: Position },

    #[error("Empty argument in function call at {position}")]
    EmptyArgument { position: Position },

    #[error("Empty statement at {position}")]
    EmptyStatement { position: Position },

    #[error("Assignment and NEW(...) are not allowed in an expression (at {position})")]
    AssignmentNotAllowed { position: Position },

    #[error("Cannot assign to {found} at {position}: target must be a column reference")]
    InvalidAssignmentTarget { found: String, position: Position },

    #[error("Expression nested deeper than {} levels at {position}", MAX_DEPTH)]
    TooDeep { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::MissingOperand { position, .. }
            | ParseError::UnmatchedParen { position }
            | ParseError::TrailingTokens { position, .. }
            | ParseError::EmptyArgument { position }
            | ParseError::EmptyStatement { position }
            | ParseError::AssignmentNotAllowed { position }
            | ParseError::InvalidAssignmentTarget { position, .. }
            | ParseError::TooDeep { position } => *position,
        }
    }
}

/// Deepest syntax tree, and deepest parenthesis or unary nesting, the
/// parser accepts.
pub const MAX_DEPTH: usize = 200;

pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    /// Tokenizes the lexer's input up front and positions the parser on the
    /// first token.
    pub fn new(lexer: Lexer) -> Result<Self, LexError> {
        let tokens = lexer.tokenize()?;
        trace!(count = tokens.len(), "tokenized formula");
        Ok(Parser {
            tokens,
            cursor: 0,
            depth: 0,
        })
    }

    fn current(&self) -> &Spanned {
        // `tokenize` guarantees a trailing Eof, and the cursor never moves past it
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn current_token(&self) -> &Token {
        &self.current().token
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn peek_token(&self, offset: usize) -> &Token {
        let index = (self.cursor + offset).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn advance(&mut self) {
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current_token()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(ParseError::UnexpectedToken {
                expected: expected.describe(),
                found: self.current_token().describe(),
                position: self.position(),
            });
        }
        self.advance();
        Ok(())
    }

    /// Requires the whole input to have been consumed.
    fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.current_token() {
            Token::Eof => Ok(()),
            Token::RParen => Err(ParseError::UnmatchedParen {
                position: self.position(),
            }),
            token => Err(ParseError::TrailingTokens {
                found: token.describe(),
                position: self.position(),
            }),
        }
    }

    /// Rejects `expr` once the tree grows past [`MAX_DEPTH`].
    fn bounded(&self, expr: Expr) -> Result<Expr, ParseError> {
        if expr.depth() > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                position: self.position(),
            });
        }
        Ok(expr)
    }

    fn binary(&self, op: BinOp, left: Expr, right: Expr) -> Result<Expr, ParseError> {
        self.bounded(Expr::binary(op, left, right))
    }

    /// Parse primary expressions (atoms): literals, column references,
    /// function calls and parenthesized expressions
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let position = self.position();

        let expr = match self.current_token().clone() {
            // Literals
            Token::Number(n) => Expr::Number(n),
            Token::String(s) => Expr::String(s),
            Token::Boolean(b) => Expr::Boolean(b),
            Token::Nil => Expr::Nil,

            // References
            Token::Identifier(name) => {
                if matches!(self.peek_token(1), Token::LParen) {
                    self.advance(); // consume name
                    return self.parse_call(name);
                }
                Expr::Identifier(name)
            }
            Token::ColumnName(name) => Expr::ColumnName(name),
            Token::ColumnIndex(index) => Expr::ColumnIndex(index),

            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                if !self.check(&Token::RParen) {
                    return Err(ParseError::UnmatchedParen { position });
                }
                self.advance();
                return Ok(expr);
            }

            token => {
                return Err(ParseError::MissingOperand {
                    found: token.describe(),
                    position,
                });
            }
        };

        self.advance();
        Ok(expr)
    }

    /// Parse the argument list of `name(`; the current token is `(`.
    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        let open = self.position();
        self.advance(); // consume '('

        let mut args = vec![];
        if self.check(&Token::RParen) {
            self.advance();
            return self.bounded(Expr::Call { name, args });
        }

        loop {
            if self.check(&Token::Comma) || self.check(&Token::RParen) {
                return Err(ParseError::EmptyArgument {
                    position: self.position(),
                });
            }
            args.push(self.parse_expression()?);

            match self.current_token() {
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(ParseError::UnmatchedParen { position: open }),
                token => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "',' or ')'".to_string(),
                        found: token.describe(),
                        position: self.position(),
                    });
                }
            }
        }

        self.bounded(Expr::Call { name, args })
    }

    /// Every parenthesis, call and unary minus passes through here, so the
    /// depth counter bounds the parser's own recursion.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                position: self.position(),
            });
        }
        self.depth += 1;
        let expr = if self.check(&Token::Minus) {
            self.advance();
            // Right-associative; represented as 0 - operand
            self.parse_unary()
                .and_then(|operand| self.binary(BinOp::Subtract, Expr::Number(0.0), operand))
        } else {
            self.parse_primary()
        };
        self.depth -= 1;
        expr
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_concat(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        while self.check(&Token::Ampersand) {
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(BinOp::Concat, left, right)?;
        }
        Ok(left)
    }

    fn comparison_op(&self) -> Option<BinOp> {
        match self.current_token() {
            Token::EqEq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        }
    }

    /// A single comparison becomes a binary node; two or more at the same
    /// level become one chain node.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_concat()?;

        let mut operands = vec![first];
        let mut operators = vec![];
        while let Some(op) = self.comparison_op() {
            self.advance();
            operators.push(op);
            operands.push(self.parse_concat()?);
        }

        match operators.len() {
            0 => Ok(operands.remove(0)),
            1 => {
                let right = operands.remove(1);
                let left = operands.remove(0);
                self.binary(operators[0], left, right)
            }
            _ => self.bounded(Expr::Chain {
                operands,
                operators,
            }),
        }
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(&Token::AndAnd) {
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance();
            let right = self.parse_and()?;
            left = self.binary(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a bare expression spanning the whole input. Assignment and
    /// `NEW(...)` forms are rejected.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        match self.current_token() {
            Token::Eof => {
                return Err(ParseError::EmptyStatement {
                    position: self.position(),
                });
            }
            Token::New => {
                return Err(ParseError::AssignmentNotAllowed {
                    position: self.position(),
                });
            }
            _ => {}
        }

        let expr = self.parse_expression()?;
        if self.check(&Token::Assign) {
            return Err(ParseError::AssignmentNotAllowed {
                position: self.position(),
            });
        }
        self.expect_end()?;
        Ok(expr)
    }

    /// Parse one statement spanning the whole input: a bare expression, an
    /// assignment, or a new-column statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match self.current_token() {
            Token::Eof => {
                return Err(ParseError::EmptyStatement {
                    position: self.position(),
                });
            }
            Token::New => self.parse_new_column()?,
            Token::Identifier(_) | Token::ColumnName(_) | Token::ColumnIndex(_)
                if matches!(self.peek_token(1), Token::Assign) =>
            {
                self.parse_assignment()?
            }
            _ => {
                let expr = self.parse_expression()?;
                if self.check(&Token::Assign) {
                    return Err(ParseError::InvalidAssignmentTarget {
                        found: "an expression".to_string(),
                        position: self.position(),
                    });
                }
                Statement::Expression(expr)
            }
        };

        self.expect_end()?;
        Ok(statement)
    }

    fn parse_new_column(&mut self) -> Result<Statement, ParseError> {
        self.advance(); // consume NEW
        self.expect(Token::LParen)?;

        let name = match self.current_token() {
            Token::String(name) => name.clone(),
            token => {
                return Err(ParseError::UnexpectedToken {
                    expected: "quoted column name".to_string(),
                    found: token.describe(),
                    position: self.position(),
                });
            }
        };
        self.advance();

        self.expect(Token::RParen)?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;

        Ok(Statement::NewColumn { name, value })
    }

    fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        let target = match self.current_token().clone() {
            Token::Identifier(name) => Expr::Identifier(name),
            Token::ColumnName(name) => Expr::ColumnName(name),
            Token::ColumnIndex(index) => Expr::ColumnIndex(index),
            token => {
                return Err(ParseError::InvalidAssignmentTarget {
                    found: token.describe(),
                    position: self.position(),
                });
            }
        };
        self.advance(); // consume target
        self.advance(); // consume '='

        let value = self.parse_expression()?;
        Ok(Statement::Assign { target, value })
    }
}

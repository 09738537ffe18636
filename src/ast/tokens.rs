use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer or decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number(f64),

    /// String literal enclosed in single or double quotes
    ///
    /// The other quote type may appear verbatim inside; there are no escapes.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it said "hi"'
    /// ```
    String(String),

    /// Boolean values
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// Nil value
    Nil,

    // References
    /// Generic identifier: a column letter (`A`, `AB`), a column name, or a
    /// function name.
    ///
    /// Whether an identifier is a column letter is decided by the binder,
    /// never by the lexer.
    ///
    /// # Examples
    /// ```text
    /// A
    /// price
    /// unit_cost
    /// ```
    Identifier(String),

    /// Bracketed column name, for names that are not valid identifiers
    ///
    /// # Examples
    /// ```text
    /// [Unit Price]
    /// [2024]
    /// ```
    ColumnName(String),

    /// Positional column reference (zero-based)
    ///
    /// # Examples
    /// ```text
    /// #0
    /// #12
    /// ```
    ColumnIndex(usize),

    /// `NEW` keyword introducing a new-column statement
    ///
    /// # Examples
    /// ```text
    /// NEW('total') = A + B
    /// ```
    New,

    // Arithmetic
    /// Addition
    Plus,

    /// Subtraction or unary negation
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// String concatenation (`&`)
    Ampersand,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Assignment operator (`=`), only valid in statements
    ///
    /// # Examples
    /// ```text
    /// B = A * 2
    /// ```
    Assign,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma for separating function arguments
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string '{}'", s),
            Token::Boolean(b) => b.to_string(),
            Token::Nil => "nil".to_string(),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::ColumnName(name) => format!("column [{}]", name),
            Token::ColumnIndex(i) => format!("column #{}", i),
            Token::New => "NEW".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Ampersand => "'&'".to_string(),
            Token::AndAnd => "'&&'".to_string(),
            Token::OrOr => "'||'".to_string(),
            Token::EqEq => "'=='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::Assign => "'='".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

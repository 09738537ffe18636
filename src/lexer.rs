use std::fmt;

use thiserror::Error;

use crate::ast::{Spanned, Token};

/// Zero-based character offset into the formula text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub offset: usize,
}

impl Position {
    pub fn new(offset: usize) -> Self {
        Position { offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.offset)
    }
}

/// Malformed input found while tokenizing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unterminated string starting at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("Unterminated column name starting at {position}: missing ']'")]
    UnterminatedColumnName { position: Position },

    #[error("Invalid numeric literal '{literal}' at {position}")]
    InvalidNumber { literal: String, position: Position },

    #[error("Invalid column index '{literal}' at {position}")]
    InvalidColumnIndex { literal: String, position: Position },

    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedCharacter { ch: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnterminatedColumnName { position }
            | LexError::InvalidNumber { position, .. }
            | LexError::InvalidColumnIndex { position, .. }
            | LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenizes the whole input. The returned sequence always ends with
    /// [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn here(&self) -> Position {
        Position::new(self.position)
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// True when the next non-whitespace character is `(`.
    fn followed_by_paren(&self) -> bool {
        self.input[self.position..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| *c == '(')
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_column_name(&mut self) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume '['

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == ']' {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedColumnName { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut number = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' {
                if seen_dot || !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    // `1.` or `1.2.3`: swallow the rest of the literal for the message
                    number.push(ch);
                    self.advance();
                    self.consume_literal_tail(&mut number);
                    return Err(LexError::InvalidNumber {
                        literal: number,
                        position: start,
                    });
                }
                seen_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.consume_literal_tail(&mut number);
            return Err(LexError::InvalidNumber {
                literal: number,
                position: start,
            });
        }

        number
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| LexError::InvalidNumber {
                literal: number,
                position: start,
            })
    }

    fn consume_literal_tail(&mut self, literal: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                literal.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_column_index(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        self.advance(); // Consume '#'

        let mut literal = String::from("#");
        self.consume_literal_tail(&mut literal);

        literal[1..]
            .parse::<usize>()
            .map(Token::ColumnIndex)
            .map_err(|_| LexError::InvalidColumnIndex {
                literal,
                position: start,
            })
    }

    /// Emits `token` after consuming `width` characters.
    fn single(&mut self, token: Token, width: usize) -> Token {
        self.position += width;
        token
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let position = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('+') => self.single(Token::Plus, 1),
            Some('-') => self.single(Token::Minus, 1),
            Some('*') => self.single(Token::Star, 1),
            Some('/') => self.single(Token::Slash, 1),
            Some(',') => self.single(Token::Comma, 1),
            Some('(') => self.single(Token::LParen, 1),
            Some(')') => self.single(Token::RParen, 1),
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.single(Token::AndAnd, 2)
                } else {
                    self.single(Token::Ampersand, 1)
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.single(Token::OrOr, 2)
                } else {
                    return Err(LexError::UnexpectedCharacter { ch: '|', position });
                }
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::EqEq, 2)
                } else {
                    self.single(Token::Assign, 1)
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::NotEq, 2)
                } else {
                    return Err(LexError::UnexpectedCharacter { ch: '!', position });
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::LtEq, 2)
                } else {
                    self.single(Token::Lt, 1)
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::GtEq, 2)
                } else {
                    self.single(Token::Gt, 1)
                }
            }
            Some(quote @ ('"' | '\'')) => Token::String(self.read_string(quote)?),
            Some('[') => Token::ColumnName(self.read_column_name()?),
            Some('#') => self.read_column_index()?,
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "nil" => Token::Nil,
                    s if s.eq_ignore_ascii_case("new") && self.followed_by_paren() => Token::New,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) => return Err(LexError::UnexpectedCharacter { ch, position }),
        };

        Ok(Spanned { token, position })
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("true false nil NEW(");
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap().token, Token::Nil);
    assert_eq!(lexer.next_token().unwrap().token, Token::New);
    assert_eq!(lexer.next_token().unwrap().token, Token::LParen);
}

#[test]
fn test_chained_comparison_tokens() {
    let tokens: Vec<Token> = Lexer::new("10 < A <= 20")
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|s| s.token)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::Number(10.0),
            Token::Lt,
            Token::Identifier("A".to_string()),
            Token::LtEq,
            Token::Number(20.0),
            Token::Eof,
        ]
    );
}

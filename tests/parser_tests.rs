// tests/parser_tests.rs

use ccl_lang::ast::{BinOp, Expr, Statement};
use ccl_lang::lexer::{Lexer, Position};
use ccl_lang::parser::{MAX_DEPTH, ParseError, Parser};

fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(input)).unwrap().parse()
}

fn parse_statement(input: &str) -> Result<Statement, ParseError> {
    Parser::new(Lexer::new(input)).unwrap().parse_statement()
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn num(n: f64) -> Expr {
    Expr::Number(n)
}

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

// ============================================================================
// Primary Expressions
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(parse("42").unwrap(), num(42.0));
    assert_eq!(parse("'hi'").unwrap(), Expr::String("hi".into()));
    assert_eq!(parse("true").unwrap(), Expr::Boolean(true));
    assert_eq!(parse("nil").unwrap(), Expr::Nil);
}

#[test]
fn test_column_references() {
    assert_eq!(parse("A").unwrap(), ident("A"));
    assert_eq!(parse("[Unit Price]").unwrap(), Expr::ColumnName("Unit Price".into()));
    assert_eq!(parse("#3").unwrap(), Expr::ColumnIndex(3));
}

#[test]
fn test_function_calls() {
    assert_eq!(
        parse("IF(A > 1, 'y', 'n')").unwrap(),
        Expr::Call {
            name: "IF".into(),
            args: vec![
                bin(BinOp::GreaterThan, ident("A"), num(1.0)),
                Expr::String("y".into()),
                Expr::String("n".into()),
            ],
        }
    );
    assert_eq!(
        parse("NOW()").unwrap(),
        Expr::Call {
            name: "NOW".into(),
            args: vec![]
        }
    );
}

#[test]
fn test_nested_calls() {
    let expr = parse("ROUND(ABS(A), 2)").unwrap();
    let Expr::Call { name, args } = expr else {
        panic!("expected call");
    };
    assert_eq!(name, "ROUND");
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0], Expr::Call { name, .. } if name == "ABS"));
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        parse("A + B * 2").unwrap(),
        bin(BinOp::Add, ident("A"), bin(BinOp::Multiply, ident("B"), num(2.0)))
    );
}

#[test]
fn test_left_associative_subtraction() {
    assert_eq!(
        parse("10 - 3 - 2").unwrap(),
        bin(
            BinOp::Subtract,
            bin(BinOp::Subtract, num(10.0), num(3.0)),
            num(2.0)
        )
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        parse("(A + B) * 2").unwrap(),
        bin(BinOp::Multiply, bin(BinOp::Add, ident("A"), ident("B")), num(2.0))
    );
}

#[test]
fn test_concat_below_additive() {
    // 'x' & A + 1  =>  'x' & (A + 1)
    assert_eq!(
        parse("'x' & A + 1").unwrap(),
        bin(
            BinOp::Concat,
            Expr::String("x".into()),
            bin(BinOp::Add, ident("A"), num(1.0))
        )
    );
}

#[test]
fn test_concat_above_comparison() {
    assert_eq!(
        parse("A & B == 'xy'").unwrap(),
        bin(
            BinOp::Equal,
            bin(BinOp::Concat, ident("A"), ident("B")),
            Expr::String("xy".into())
        )
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse("A > 1 || B > 2 && C > 3").unwrap(),
        bin(
            BinOp::Or,
            bin(BinOp::GreaterThan, ident("A"), num(1.0)),
            bin(
                BinOp::And,
                bin(BinOp::GreaterThan, ident("B"), num(2.0)),
                bin(BinOp::GreaterThan, ident("C"), num(3.0))
            )
        )
    );
}

#[test]
fn test_unary_minus() {
    assert_eq!(
        parse("-A * 2").unwrap(),
        bin(
            BinOp::Multiply,
            bin(BinOp::Subtract, num(0.0), ident("A")),
            num(2.0)
        )
    );
    assert_eq!(
        parse("--3").unwrap(),
        bin(
            BinOp::Subtract,
            num(0.0),
            bin(BinOp::Subtract, num(0.0), num(3.0))
        )
    );
}

// ============================================================================
// Chained Comparisons
// ============================================================================

#[test]
fn test_single_comparison_is_binary() {
    assert_eq!(
        parse("A < 20").unwrap(),
        bin(BinOp::LessThan, ident("A"), num(20.0))
    );
}

#[test]
fn test_two_comparisons_chain() {
    assert_eq!(
        parse("10 < A < 20").unwrap(),
        Expr::Chain {
            operands: vec![num(10.0), ident("A"), num(20.0)],
            operators: vec![BinOp::LessThan, BinOp::LessThan],
        }
    );
}

#[test]
fn test_mixed_chain_operators() {
    let Expr::Chain {
        operands,
        operators,
    } = parse("0 <= A < B != 5").unwrap()
    else {
        panic!("expected chain");
    };
    assert_eq!(operands.len(), 4);
    assert_eq!(
        operators,
        vec![BinOp::LessEqual, BinOp::LessThan, BinOp::NotEqual]
    );
}

#[test]
fn test_logical_operator_breaks_chain() {
    assert_eq!(
        parse("1 < A && A < 5").unwrap(),
        bin(
            BinOp::And,
            bin(BinOp::LessThan, num(1.0), ident("A")),
            bin(BinOp::LessThan, ident("A"), num(5.0))
        )
    );
}

#[test]
fn test_chain_operands_are_full_expressions() {
    let Expr::Chain { operands, .. } = parse("A + 1 < B * 2 < C & 'x'").unwrap() else {
        panic!("expected chain");
    };
    assert!(matches!(operands[0], Expr::BinaryOp { op: BinOp::Add, .. }));
    assert!(matches!(operands[1], Expr::BinaryOp { op: BinOp::Multiply, .. }));
    assert!(matches!(operands[2], Expr::BinaryOp { op: BinOp::Concat, .. }));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_bare_expression_statement() {
    assert_eq!(
        parse_statement("A * 2").unwrap(),
        Statement::Expression(bin(BinOp::Multiply, ident("A"), num(2.0)))
    );
}

#[test]
fn test_assignment_statement() {
    assert_eq!(
        parse_statement("B = A * 2").unwrap(),
        Statement::Assign {
            target: ident("B"),
            value: bin(BinOp::Multiply, ident("A"), num(2.0)),
        }
    );
    assert_eq!(
        parse_statement("[Unit Price] = 1").unwrap(),
        Statement::Assign {
            target: Expr::ColumnName("Unit Price".into()),
            value: num(1.0),
        }
    );
    assert_eq!(
        parse_statement("#2 = nil").unwrap(),
        Statement::Assign {
            target: Expr::ColumnIndex(2),
            value: Expr::Nil,
        }
    );
}

#[test]
fn test_assignment_value_may_compare() {
    assert_eq!(
        parse_statement("C = A == B").unwrap(),
        Statement::Assign {
            target: ident("C"),
            value: bin(BinOp::Equal, ident("A"), ident("B")),
        }
    );
}

#[test]
fn test_new_column_statement() {
    assert_eq!(
        parse_statement("NEW('total') = A + B").unwrap(),
        Statement::NewColumn {
            name: "total".into(),
            value: bin(BinOp::Add, ident("A"), ident("B")),
        }
    );
    assert_eq!(
        parse_statement(r#"new("with space") = 1"#).unwrap(),
        Statement::NewColumn {
            name: "with space".into(),
            value: num(1.0),
        }
    );
}

#[test]
fn test_new_requires_quoted_name() {
    assert!(matches!(
        parse_statement("NEW(total) = 1"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_expression_entry_rejects_assignment() {
    assert_eq!(
        parse("B = A * 2"),
        Err(ParseError::AssignmentNotAllowed {
            position: Position::new(2)
        })
    );
    assert_eq!(
        parse("NEW('x') = 1"),
        Err(ParseError::AssignmentNotAllowed {
            position: Position::new(0)
        })
    );
}

#[test]
fn test_assignment_to_expression_is_rejected() {
    assert!(matches!(
        parse_statement("A + 1 = 3"),
        Err(ParseError::InvalidAssignmentTarget { .. })
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_operand() {
    assert_eq!(
        parse("A +"),
        Err(ParseError::MissingOperand {
            found: "end of input".into(),
            position: Position::new(3)
        })
    );
    assert!(matches!(parse("* 2"), Err(ParseError::MissingOperand { .. })));
}

#[test]
fn test_unmatched_parentheses() {
    assert_eq!(
        parse("(A + 1"),
        Err(ParseError::UnmatchedParen {
            position: Position::new(0)
        })
    );
    assert_eq!(
        parse("A + 1)"),
        Err(ParseError::UnmatchedParen {
            position: Position::new(5)
        })
    );
    assert_eq!(
        parse("IF(A, 1, 2"),
        Err(ParseError::UnmatchedParen {
            position: Position::new(2)
        })
    );
}

#[test]
fn test_trailing_tokens() {
    assert!(matches!(
        parse("A B"),
        Err(ParseError::TrailingTokens { position, .. }) if position == Position::new(2)
    ));
}

#[test]
fn test_empty_arguments() {
    for input in ["IF(, 1, 2)", "IF(A,, 2)", "CONCAT(A,)"] {
        assert!(
            matches!(parse(input), Err(ParseError::EmptyArgument { .. })),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_empty_input() {
    assert!(matches!(parse("   "), Err(ParseError::EmptyStatement { .. })));
    assert!(matches!(
        parse_statement(""),
        Err(ParseError::EmptyStatement { .. })
    ));
}

#[test]
fn test_error_messages_carry_position() {
    let err = parse("A + )").unwrap_err();
    assert_eq!(err.position(), Position::new(4));
    assert!(err.to_string().contains("position 4"));
}

#[test]
fn test_nesting_limit() {
    let parens = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    assert_eq!(
        parse(&parens),
        Err(ParseError::TooDeep {
            position: Position::new(MAX_DEPTH)
        })
    );

    let deep = [
        format!("{}1", "-".repeat(50_000)),
        format!("{}1{}", "ABS(".repeat(10_000), ")".repeat(10_000)),
        format!("1{}", " + 1".repeat(10_000)),
        format!("1{}", " & 'x'".repeat(MAX_DEPTH)),
    ];
    for input in &deep {
        assert!(
            matches!(parse(input), Err(ParseError::TooDeep { .. })),
            "Failed for input of {} chars",
            input.len()
        );
    }
    assert!(matches!(
        parse_statement(&format!("NEW('x') = {}", parens)),
        Err(ParseError::TooDeep { .. })
    ));
}

#[test]
fn test_nesting_within_limit() {
    let nested = format!("{}A + 1{}", "(".repeat(150), ")".repeat(150));
    assert_eq!(parse(&nested).unwrap(), bin(BinOp::Add, ident("A"), num(1.0)));

    let wide = format!("CONCAT({})", vec!["A"; 5_000].join(", "));
    assert_eq!(parse(&wide).unwrap().depth(), 2);
    assert!(parse(&format!("1{}", " + 1".repeat(MAX_DEPTH - 1))).is_ok());
}

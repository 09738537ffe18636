// tests/script_tests.rs

use ccl_lang::script::split_statements;
use ccl_lang::{CompileError, Expr, ParseError, Statement, compile_multiline};

#[test]
fn test_semicolon_inside_string_does_not_split() {
    let statements = compile_multiline("A = 'x;y'; B = 1").unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0],
        Statement::Assign {
            target: Expr::Identifier("A".into()),
            value: Expr::String("x;y".into()),
        }
    );
}

#[test]
fn test_newlines_separate_statements() {
    let script = "NEW('total') = price * qty\nNEW('label') = 'T: ' & total\n";
    let statements = compile_multiline(script).unwrap();
    assert_eq!(statements.len(), 2);
    assert!(matches!(&statements[1], Statement::NewColumn { name, .. } if name == "label"));
}

#[test]
fn test_statement_order_is_preserved() {
    let statements = compile_multiline("A = 1; B = 2\nC = 3").unwrap();
    let targets: Vec<String> = statements
        .iter()
        .map(|s| match s {
            Statement::Assign {
                target: Expr::Identifier(name),
                ..
            } => name.clone(),
            other => panic!("unexpected statement {:?}", other),
        })
        .collect();
    assert_eq!(targets, vec!["A", "B", "C"]);
}

#[test]
fn test_empty_script() {
    assert!(compile_multiline("").unwrap().is_empty());
    assert!(compile_multiline(" ;\n ; ").unwrap().is_empty());
}

#[test]
fn test_bare_expressions_are_statements() {
    let statements = compile_multiline("A * 2; B = 1").unwrap();
    assert!(statements[0].is_expression());
    assert!(!statements[1].is_expression());
}

#[test]
fn test_failing_statement_is_identified() {
    let err = compile_multiline("A = 1\nB = A +\nC = 2").unwrap_err();
    let CompileError::Statement { line, text, source } = &err else {
        panic!("expected statement error, got {:?}", err);
    };
    assert_eq!(*line, 2);
    assert_eq!(text, "B = A +");
    assert!(matches!(
        **source,
        CompileError::Parse(ParseError::MissingOperand { .. })
    ));
    assert!(err.to_string().starts_with("Statement 2 ('B = A +')"));
}

#[test]
fn test_lex_error_inside_script() {
    let err = compile_multiline("A = 1; B = 'open").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Statement { line: 2, ref source, .. } if matches!(**source, CompileError::Lex(_))
    ));
}

#[test]
fn test_split_keeps_bracketed_separators() {
    assert_eq!(
        split_statements("NEW('a;b') = [x;y] & \"c\nd\"; B = 2"),
        vec!["NEW('a;b') = [x;y] & \"c\nd\"", "B = 2"]
    );
}

// tests/cli_tests.rs

use ccl_lang::cli::{
    CheckOptions, CheckResult, CliError, execute_check, get_doc_category, get_docs_overview,
    json_to_table, json_to_value, table_to_json, value_to_json,
};
use ccl_lang::{ErrorPolicy, EvalOptions, TableError, Value};
use serde_json::json;

const DATASET: &str = r#"{
    "columns": ["name", "price", "qty"],
    "rows": [
        ["apple", 1.5, 4],
        ["pear", "2", null],
        ["plum", null, 3]
    ]
}"#;

fn run(formula: &str, script: bool) -> Result<serde_json::Value, CliError> {
    let options = CheckOptions {
        formula: formula.to_string(),
        input: Some(DATASET.to_string()),
        script,
        ..Default::default()
    };
    match execute_check(&options)? {
        CheckResult::Success(output) => Ok(output),
        CheckResult::SyntaxValid => panic!("expected evaluation output"),
    }
}

// ============================================================================
// Eval
// ============================================================================

#[test]
fn test_eval_expression_appends_result_column() {
    let output = run("price * qty", false).unwrap();
    assert_eq!(output["columns"], json!(["name", "price", "qty", "result"]));
    assert_eq!(
        output["rows"],
        json!([
            ["apple", 1.5, 4, 6],
            ["pear", "2", null, 0],
            ["plum", null, 3, 0]
        ])
    );
}

#[test]
fn test_eval_uses_requested_name() {
    let options = CheckOptions {
        formula: "UPPER(name)".to_string(),
        input: Some(DATASET.to_string()),
        name: "shout".to_string(),
        ..Default::default()
    };
    let CheckResult::Success(output) = execute_check(&options).unwrap() else {
        panic!("expected evaluation output");
    };
    assert_eq!(output["columns"][3], json!("shout"));
    assert_eq!(output["rows"][2][3], json!("PLUM"));
}

#[test]
fn test_eval_script() {
    let output = run(
        "NEW('total') = price * qty\nNEW('label') = name & ': ' & total; qty = IFNIL(qty, 1)",
        true,
    )
    .unwrap();
    assert_eq!(
        output["columns"],
        json!(["name", "price", "qty", "total", "label"])
    );
    assert_eq!(output["rows"][0], json!(["apple", 1.5, 4, 6, "apple: 6"]));
    assert_eq!(output["rows"][1], json!(["pear", "2", 1, 0, "pear: 0"]));
}

#[test]
fn test_eval_row_error_aborts() {
    let err = run("name * 2", false).unwrap_err();
    assert!(matches!(err, CliError::Table(TableError::Row { row: 0, .. })));
}

#[test]
fn test_eval_nil_policy() {
    let options = CheckOptions {
        formula: "price * 2".to_string(),
        input: Some(r#"{"columns": ["name", "price"], "rows": [["a", 2], ["b", true]]}"#.to_string()),
        eval: EvalOptions {
            on_error: ErrorPolicy::Nil,
            ..EvalOptions::default()
        },
        ..Default::default()
    };
    let CheckResult::Success(output) = execute_check(&options).unwrap() else {
        panic!("expected evaluation output");
    };
    assert_eq!(output["rows"], json!([["a", 2, 4], ["b", true, null]]));
}

#[test]
fn test_eval_without_input() {
    let options = CheckOptions {
        formula: "1".to_string(),
        ..Default::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::NoInput)));
}

#[test]
fn test_syntax_only() {
    let options = CheckOptions {
        formula: "NEW('x') = 1; B = x".to_string(),
        script: true,
        syntax_only: true,
        ..Default::default()
    };
    assert!(matches!(
        execute_check(&options),
        Ok(CheckResult::SyntaxValid)
    ));

    let options = CheckOptions {
        formula: "NEW('x') = 1".to_string(),
        syntax_only: true,
        ..Default::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::Compile(_))));
}

// ============================================================================
// Dataset Conversion
// ============================================================================

#[test]
fn test_json_values() {
    assert_eq!(json_to_value(json!(null)), Value::Nil);
    assert_eq!(json_to_value(json!(2)), Value::Number(2.0));
    assert_eq!(json_to_value(json!("x")), Value::Text("x".into()));
    assert_eq!(json_to_value(json!([1, 2])), Value::Text("[1,2]".into()));

    assert_eq!(value_to_json(&Value::Number(3.0)), json!(3));
    assert_eq!(value_to_json(&Value::Number(0.5)), json!(0.5));
    assert_eq!(value_to_json(&Value::Number(f64::INFINITY)), json!(null));
    assert_eq!(value_to_json(&Value::Boolean(false)), json!(false));
}

#[test]
fn test_short_rows_are_padded() {
    let table = json_to_table(json!({"columns": ["a", "b"], "rows": [[1]]})).unwrap();
    assert_eq!(table.column(1).unwrap().values, vec![Value::Nil]);
    assert_eq!(
        table_to_json(&table),
        json!({"columns": ["a", "b"], "rows": [[1, null]]})
    );
}

#[test]
fn test_malformed_datasets() {
    for doc in [
        json!([1, 2]),
        json!({"rows": []}),
        json!({"columns": [1], "rows": []}),
        json!({"columns": ["a"], "rows": [1]}),
        json!({"columns": ["a"], "rows": [[1, 2]]}),
    ] {
        assert!(
            matches!(json_to_table(doc.clone()), Err(CliError::Dataset(_))),
            "Failed for dataset: {}",
            doc
        );
    }
}

#[test]
fn test_invalid_json_input() {
    let options = CheckOptions {
        formula: "1".to_string(),
        input: Some("{not json".to_string()),
        ..Default::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::Json(_))));
}

// ============================================================================
// Docs
// ============================================================================

#[test]
fn test_docs() {
    assert!(get_docs_overview().contains("DOCUMENTATION CATEGORIES"));
    assert!(get_doc_category("types").unwrap().contains("<nil>"));
    assert!(get_doc_category("Functions").unwrap().contains("ROUND(number[, digits])"));
    assert!(matches!(
        get_doc_category("nope"),
        Err(CliError::UnknownCategory(_))
    ));
}

//! JSON <-> dataset conversion utilities
//!
//! Datasets travel as `{"columns": ["a", "b"], "rows": [[1, "x"], [2, null]]}`.

use serde_json::{Map, json};

use super::CliError;
use crate::{Table, Value};

/// Convert a JSON scalar to a cell value. Arrays and objects are stored as
/// their JSON text.
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Nil),
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

/// Convert a cell value to JSON. Non-finite numbers become null.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Nil => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
                // whole numbers print without a trailing `.0`
                serde_json::Value::Number((*n as i64).into())
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::Text(s) => serde_json::Value::String(s.clone()),
    }
}

/// Build a table from a dataset document.
pub fn json_to_table(doc: serde_json::Value) -> Result<Table, CliError> {
    let serde_json::Value::Object(mut obj) = doc else {
        return Err(CliError::Dataset(
            "expected an object with \"columns\" and \"rows\"".to_string(),
        ));
    };

    let names: Vec<String> = match obj.remove("columns") {
        Some(serde_json::Value::Array(cols)) => cols
            .into_iter()
            .map(|c| match c {
                serde_json::Value::String(s) => Ok(s),
                other => Err(CliError::Dataset(format!(
                    "column names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(CliError::Dataset("\"columns\" must be an array".to_string())),
    };

    let rows = match obj.remove("rows") {
        Some(serde_json::Value::Array(rows)) => rows,
        None => Vec::new(),
        Some(_) => return Err(CliError::Dataset("\"rows\" must be an array".to_string())),
    };

    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for (i, row) in rows.into_iter().enumerate() {
        let serde_json::Value::Array(cells) = row else {
            return Err(CliError::Dataset(format!("row {} is not an array", i)));
        };
        if cells.len() > names.len() {
            return Err(CliError::Dataset(format!(
                "row {} has {} cells but there are {} columns",
                i,
                cells.len(),
                names.len()
            )));
        }
        let mut cells = cells.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().map(json_to_value).unwrap_or(Value::Nil));
        }
    }

    let mut table = Table::new();
    for (name, values) in names.into_iter().zip(columns) {
        table.push_column(name, values);
    }
    Ok(table)
}

/// Render a table in the same shape [`json_to_table`] reads.
pub fn table_to_json(table: &Table) -> serde_json::Value {
    let columns: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    let rows: Vec<serde_json::Value> = (0..table.row_count())
        .map(|r| {
            serde_json::Value::Array(
                table
                    .columns()
                    .iter()
                    .map(|c| c.values.get(r).map(value_to_json).unwrap_or_default())
                    .collect(),
            )
        })
        .collect();

    let mut out = Map::new();
    out.insert("columns".to_string(), json!(columns));
    out.insert("rows".to_string(), serde_json::Value::Array(rows));
    serde_json::Value::Object(out)
}

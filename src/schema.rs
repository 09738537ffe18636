//! Column names known at bind time, and the per-row cell accessor used at
//! evaluation time.

use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// Ordered column names of a dataset; a column's index is its position.
///
/// Unnamed columns have no entry and are only reachable by letter or
/// `#index`, so a wide schema with few names stays small.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    names: BTreeMap<usize, String>,
    width: usize,
}

impl Schema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Schema::default();
        for name in names {
            schema.push(name);
        }
        schema
    }

    /// Index of the first column named `name`.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(index, _)| *index)
    }

    /// Name of the column at `index`; unnamed columns inside the width
    /// yield `""`.
    pub fn name_of(&self, index: usize) -> Option<&str> {
        if index >= self.width {
            return None;
        }
        Some(self.names.get(&index).map_or("", String::as_str))
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Appends a column and returns its index.
    pub fn push(&mut self, name: impl Into<String>) -> usize {
        let index = self.width;
        let name = name.into();
        if !name.is_empty() {
            self.names.insert(index, name);
        }
        self.width += 1;
        index
    }
}

impl From<HashMap<String, usize>> for Schema {
    /// Builds a schema from a name→index map. The width is one past the
    /// highest index; indexes the map skips become unnamed columns. An entry
    /// at `usize::MAX` has no representable width and is dropped.
    fn from(map: HashMap<String, usize>) -> Self {
        let names: BTreeMap<usize, String> = map
            .into_iter()
            .filter_map(|(name, index)| index.checked_add(1).map(|_| (index, name)))
            .collect();
        let width = names.keys().next_back().map_or(0, |last| last + 1);
        Schema { names, width }
    }
}

/// Read access to one row's raw cells.
///
/// Implementations must return [`Value::Nil`] for indexes the row does not
/// hold.
pub trait RowView {
    fn cell(&self, index: usize) -> Value;
}

impl RowView for [Value] {
    fn cell(&self, index: usize) -> Value {
        self.get(index).cloned().unwrap_or_default()
    }
}

impl RowView for Vec<Value> {
    fn cell(&self, index: usize) -> Value {
        self.as_slice().cell(index)
    }
}

impl<const N: usize> RowView for [Value; N] {
    fn cell(&self, index: usize) -> Value {
        self.as_slice().cell(index)
    }
}

impl RowView for HashMap<usize, Value> {
    fn cell(&self, index: usize) -> Value {
        self.get(&index).cloned().unwrap_or_default()
    }
}

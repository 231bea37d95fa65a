use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

/// A single record: an ordered mapping from column name to its raw string value.
///
/// A column that is not present in the mapping is treated as `NULL` everywhere in
/// the engine. Key order follows the order in which values were first set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, String>);

impl Row {
    pub fn new() -> Row {
        Row(IndexMap::new())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Row
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Row(pairs
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: &str, value: String) {
        //! Overwrite the value of a column, keeping its position if it was
        //! already present.

        if let Some(slot) = self.0.get_mut(column) {
            *slot = value;
        } else {
            self.0.insert(column.to_string(), value);
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.0.shift_remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", row.join(" | "))
    }
}

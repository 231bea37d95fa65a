use std::fmt::Display;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::persistence::{Row, TableReader};

/// The rows a statement hands back, with their column labels in output order.
///
/// Rows may lack some of the labelled columns; those cells are NULL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// After a statement runs, the result is handed back to the caller.
///
/// `rows` is only set for statements that produce rows (SELECT, SHOW TABLES).
/// `n_rows_processed` counts returned rows for those, and touched rows for
/// INSERT, UPDATE and DELETE.
#[derive(Clone, Debug, PartialEq)]
pub struct SqlResult {
    pub rows: Option<ResultSet>,
    pub n_rows_processed: usize,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> ResultSet {
        ResultSet { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        //! All values of one column, top to bottom.

        self.rows.iter().map(|row| row.get(column)).collect()
    }
}

impl From<TableReader> for ResultSet {
    fn from(reader: TableReader) -> Self {
        ResultSet {
            columns: reader.columns,
            rows: reader.rows,
        }
    }
}

impl SqlResult {
    pub fn rows(rows: ResultSet) -> SqlResult {
        let n_rows_processed = rows.len();
        SqlResult {
            rows: Some(rows),
            n_rows_processed,
        }
    }

    pub fn processed(n_rows_processed: usize) -> SqlResult {
        SqlResult {
            rows: None,
            n_rows_processed,
        }
    }
}

const NULL_DISPLAY: &str = "NULL";

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells: Vec<Vec<&str>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column).unwrap_or(NULL_DISPLAY))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                cells
                    .iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border: String = widths
            .iter()
            .map(|width| format!("+{}", "-".repeat(width + 2)))
            .collect::<String>()
            + "+";

        writeln!(f, "{}", border)?;
        write_line(f, &self.columns.iter().map(String::as_str).collect::<Vec<_>>(), &widths)?;
        writeln!(f, "{}", border)?;
        for row in cells.iter() {
            write_line(f, row, &widths)?;
        }
        write!(f, "{}", border)
    }
}

fn write_line(f: &mut std::fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> std::fmt::Result {
    for (cell, width) in cells.iter().zip(widths) {
        write!(f, "| {:width$} ", cell, width = *width)?;
    }
    writeln!(f, "|")
}

impl Serialize for ResultSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        //! Serialized as an array of objects with every labelled column present,
        //! absent cells as `null`.

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows.iter() {
            let record: IndexMap<&str, Option<&str>> = self
                .columns
                .iter()
                .map(|column| (column.as_str(), row.get(column)))
                .collect();
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

use std::cmp::Ordering;
use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::row::Row;
use crate::error::{EngineError, Result};

/// An ordered collection of [`Row`]s under a name.
///
/// The column set given at creation is only a starting point: values are raw strings
/// and nothing about the columns is enforced afterwards. Inserting a row that carries
/// a column the table has not seen yet registers that column at the end of the set,
/// so the set always covers every key of every stored row.
#[derive(Debug)]
pub struct Table {
    name: String,
    columns: IndexSet<String>,
    rows: Vec<Row>,
}

/// A detached snapshot of a table used to run read queries.
///
/// Each step consumes the reader and hands back a narrower one, so a SELECT is a
/// chain like `table.reader().filter(..).order_by(..).offset(..).limit(..)`.
#[derive(Clone, Debug)]
pub struct TableReader {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, columns: Vec<String>) -> Result<Table> {
        //! Return a new empty table with the given initial columns.
        //!
        //! Fails with [`EngineError::DuplicateColumn`] when a column name repeats.

        let mut column_set = IndexSet::with_capacity(columns.len());

        for column in columns {
            if !column_set.insert(column.clone()) {
                return Err(EngineError::DuplicateColumn(column));
            }
        }

        Ok(Table {
            name,
            columns: column_set,
            rows: vec![],
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> Vec<String> {
        self.columns.iter().cloned().collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn register_column(&mut self, column: &str) -> bool {
        //! Add a column to the end of the known set. Returns `false` when the table
        //! already knows it.

        if self.columns.contains(column) {
            return false;
        }

        debug!("table {}: new column '{}' registered", self.name, column);
        self.columns.insert(column.to_string())
    }

    pub fn insert(&mut self, row: Row) {
        //! Append a row to the end of the table. Columns unknown to the table are
        //! registered on the way in.

        for column in row.columns() {
            self.register_column(column);
        }

        self.rows.push(row);
    }

    pub fn update_where<F>(
        &mut self,
        filter: Option<F>,
        assignments: &IndexMap<String, Option<String>>,
    ) -> usize
    where
        F: Fn(&Row) -> bool,
    {
        //! Apply every assignment to each row that passes the filter, or to all rows
        //! when there is no filter. A `None` value clears the column in that row.
        //!
        //! Returns the number of rows touched.

        for column in assignments.keys() {
            self.register_column(column);
        }

        let mut n_updated = 0;

        for row in self.rows.iter_mut() {
            if let Some(filter) = filter.as_ref() {
                if !filter(row) {
                    continue;
                }
            }

            for (column, value) in assignments.iter() {
                match value {
                    Some(value) => row.set(column, value.clone()),
                    None => {
                        row.remove(column);
                    }
                }
            }

            n_updated += 1;
        }

        n_updated
    }

    pub fn delete_where<F>(&mut self, filter: Option<F>) -> usize
    where
        F: Fn(&Row) -> bool,
    {
        //! Remove each row that passes the filter, or every row when there is no
        //! filter. The surviving rows keep their relative order.
        //!
        //! Returns the number of rows removed.

        let before = self.rows.len();

        match filter {
            Some(filter) => self.rows.retain(|row| !filter(row)),
            None => self.rows.clear(),
        }

        before - self.rows.len()
    }

    pub fn reader(&self) -> TableReader {
        //! Get a reader for the table to perform read queries.
        //!
        //! The reader owns a copy of the rows so the table can be mutated again
        //! as soon as the read is done.

        TableReader {
            columns: self.columns(),
            rows: self.rows.clone(),
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        writeln!(f, "{}", columns.join(" | "))?;

        for row in self.rows.iter() {
            writeln!(f, "{}", row)?;
        }

        Ok(())
    }
}

impl TableReader {
    pub fn scan(&self) -> Vec<Row> {
        self.rows.clone()
    }

    pub fn count_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn filter<F>(self, filter: F) -> TableReader
    where
        F: Fn(&Row) -> bool,
    {
        TableReader {
            columns: self.columns,
            rows: self.rows.into_iter().filter(|row| filter(row)).collect(),
        }
    }

    pub fn order_by<F>(mut self, compare: F) -> TableReader
    where
        F: FnMut(&Row, &Row) -> Ordering,
    {
        //! Sort the rows with the given comparator. The sort is stable, so rows that
        //! compare equal keep their table order.

        self.rows.sort_by(compare);
        self
    }

    pub fn offset(mut self, offset: Option<usize>) -> TableReader {
        if let Some(offset) = offset {
            let offset = offset.min(self.rows.len());
            self.rows.drain(..offset);
        }
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> TableReader {
        if let Some(limit) = limit {
            self.rows.truncate(limit);
        }
        self
    }

    pub fn select(self, fields: &[(String, String)]) -> TableReader {
        //! Project each row onto `fields`, given as `(source column, output label)`
        //! pairs. Absent values stay absent in the projected row.

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut projected = Row::new();
                for (source, label) in fields {
                    if let Some(value) = row.get(source) {
                        projected.set(label, value.to_string());
                    }
                }
                projected
            })
            .collect();

        TableReader {
            columns: fields.iter().map(|(_, label)| label.clone()).collect(),
            rows,
        }
    }
}

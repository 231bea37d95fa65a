use indexmap::IndexMap;
use log::info;

use super::table::Table;
use crate::error::{EngineError, Result};

/// The collective of multiple [`Table`] objects.
///
/// A [`Database`] lives as long as the engine that owns it and is gone with it;
/// nothing is written anywhere. Tables are kept in creation order so listings are
/// stable between runs.
///
/// This is the smart half of storage: it resolves names and reports missing or
/// clashing tables. [`Table`] is the dumb half that only knows how to hold rows.
#[derive(Debug, Default)]
pub struct Database {
    tables: IndexMap<String, Table>,
}

impl Database {
    pub fn new() -> Database {
        //! Create a new database with no tables.

        Database {
            tables: IndexMap::new(),
        }
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<String>) -> Result<()> {
        //! Create a [`Table`] with the initial `columns`.
        //!
        //! Fails with [`EngineError::TableExists`] if the name is taken.

        if self.tables.contains_key(name) {
            return Err(EngineError::TableExists(name.to_string()));
        }

        let table = Table::new(name.to_string(), columns)?;
        info!("created table {} ({})", name, table.columns().join(", "));
        self.tables.insert(name.to_string(), table);

        Ok(())
    }

    pub fn create_table_if_not_exists(&mut self, name: &str, columns: Vec<String>) -> Result<bool> {
        //! Same as [`Database::create_table`] but leaves an existing table alone.
        //!
        //! Returns whether a table was created.

        if self.tables.contains_key(name) {
            return Ok(false);
        }

        self.create_table(name, columns)?;
        Ok(true)
    }

    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let table = self
            .tables
            .shift_remove(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;

        info!("dropped table {} with {} row(s)", name, table.len());
        Ok(table)
    }

    pub fn drop_table_if_exists(&mut self, name: &str) -> bool {
        self.drop_table(name).is_ok()
    }

    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

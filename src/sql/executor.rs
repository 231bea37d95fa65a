use std::cmp::Ordering;

use indexmap::IndexSet;
use log::debug;

use super::predicate::{Predicate, compare_optional};
use super::result::{ResultSet, SqlResult};
use super::statement::{FunctionArg, OrderKey, Projection, SelectStatement, Statement};
use crate::error::{EngineError, Result};
use crate::persistence::{Database, Row, Table};

/// The executor that runs statements against a [`Database`].
///
/// Every statement needs an executor to be run. The executor borrows the database
/// mutably for its whole lifetime, so a statement always sees and leaves the
/// storage in a consistent state.
///
/// Statements are checked before they touch anything: unknown tables and columns
/// and malformed INSERT tuples are reported without leaving a half-applied change.
pub struct SqlExecutor<'a> {
    database: &'a mut Database,
}

impl<'a> SqlExecutor<'a> {
    pub fn new(database: &'a mut Database) -> SqlExecutor<'a> {
        SqlExecutor { database }
    }

    pub fn execute(&mut self, statement: Statement) -> Result<SqlResult> {
        //! Run a single statement and hand back its result.

        debug!("executing {}", statement.kind());

        match statement {
            Statement::Select(select) => self.select(select),
            Statement::Insert {
                table,
                columns,
                rows,
            } => self.insert(&table, columns, rows),
            Statement::Update {
                table,
                assignments,
                filter,
            } => {
                let table = self.database.get_table_mut(&table)?;
                if let Some(filter) = filter.as_ref() {
                    check_predicate_columns(table, filter)?;
                }

                let n_updated =
                    table.update_where(filter.as_ref().map(|f| |row: &Row| f.evaluate(row)), &assignments);
                debug!("updated {} row(s) in {}", n_updated, table.name());

                Ok(SqlResult::processed(n_updated))
            }
            Statement::Delete { table, filter } => {
                let table = self.database.get_table_mut(&table)?;
                if let Some(filter) = filter.as_ref() {
                    check_predicate_columns(table, filter)?;
                }

                let n_deleted =
                    table.delete_where(filter.as_ref().map(|f| |row: &Row| f.evaluate(row)));
                debug!("deleted {} row(s) from {}", n_deleted, table.name());

                Ok(SqlResult::processed(n_deleted))
            }
            Statement::CreateTable {
                name,
                columns,
                if_not_exists,
            } => {
                if if_not_exists {
                    self.database.create_table_if_not_exists(&name, columns)?;
                } else {
                    self.database.create_table(&name, columns)?;
                }

                Ok(SqlResult::processed(0))
            }
            Statement::DropTable { names, if_exists } => {
                if !if_exists {
                    if let Some(missing) = names.iter().find(|n| !self.database.contains_table(n)) {
                        return Err(EngineError::TableNotFound(missing.clone()));
                    }
                }

                for name in names.iter() {
                    self.database.drop_table_if_exists(name);
                }

                Ok(SqlResult::processed(0))
            }
            Statement::ShowTables => {
                let rows = self
                    .database
                    .table_names()
                    .into_iter()
                    .map(|name| Row::from_pairs([("table", name)]))
                    .collect();

                Ok(SqlResult::rows(ResultSet::new(vec!["table".to_string()], rows)))
            }
        }
    }

    fn select(&self, select: SelectStatement) -> Result<SqlResult> {
        //! Filter, then order, then cut, then project.
        //!
        //! Aggregates fold the filtered rows into one row before LIMIT and OFFSET
        //! apply, as in any SQL engine without GROUP BY.

        let table = self.database.get_table(&select.table)?;
        check_labels(&select.projection)?;

        let order_by: Vec<OrderKey> = select
            .order_by
            .iter()
            .map(|key| resolve_alias(key, &select.projection))
            .collect();

        let mut referenced: Vec<&str> = vec![];
        match &select.projection {
            Projection::All => {}
            Projection::Columns(columns) => referenced.extend(columns.iter().map(|c| c.name.as_str())),
            Projection::Aggregates(calls) => {
                referenced.extend(calls.iter().filter_map(|call| match &call.arg {
                    FunctionArg::Column(name) => Some(name.as_str()),
                    FunctionArg::Wildcard => None,
                }))
            }
        }
        referenced.extend(order_by.iter().map(|key| key.column.as_str()));
        if let Some(filter) = select.filter.as_ref() {
            referenced.extend(filter.columns());
        }
        check_columns(table, referenced)?;

        debug!(
            "selecting {} from {}{}",
            select.projection,
            table.name(),
            select
                .filter
                .as_ref()
                .map(|f| format!(" where {}", f))
                .unwrap_or_default()
        );

        let mut reader = table.reader();
        if let Some(filter) = select.filter.as_ref() {
            reader = reader.filter(|row| filter.evaluate(row));
        }

        let result = match &select.projection {
            Projection::Aggregates(calls) => {
                let mut row = Row::new();
                let mut columns = vec![];

                for call in calls.iter() {
                    let label = call.label();
                    if let Some(value) = call.aggregator.run(&call.arg, &reader.rows)? {
                        row.set(&label, value);
                    }
                    columns.push(label);
                }

                let rows: Vec<Row> = vec![row]
                    .into_iter()
                    .skip(select.offset.unwrap_or(0))
                    .take(select.limit.unwrap_or(usize::MAX))
                    .collect();

                ResultSet::new(columns, rows)
            }
            projection => {
                if !order_by.is_empty() {
                    reader = reader.order_by(|a, b| compare_rows(a, b, &order_by));
                }

                reader = reader.offset(select.offset).limit(select.limit);

                match projection {
                    Projection::Columns(columns) => {
                        let fields: Vec<(String, String)> = columns
                            .iter()
                            .map(|c| (c.name.clone(), c.label().to_string()))
                            .collect();
                        reader.select(&fields).into()
                    }
                    _ => reader.into(),
                }
            }
        };

        debug!("{} row(s) selected", result.len());
        Ok(SqlResult::rows(result))
    }

    fn insert(
        &mut self,
        table_name: &str,
        columns: Option<Vec<String>>,
        values: Vec<Vec<Option<String>>>,
    ) -> Result<SqlResult> {
        //! Insert every VALUES tuple, or none of them if any tuple is malformed.

        let table = self.database.get_table_mut(table_name)?;
        let columns = columns.unwrap_or_else(|| table.columns());

        let mut seen = IndexSet::new();
        for column in columns.iter() {
            if !seen.insert(column) {
                return Err(EngineError::DuplicateColumn(column.clone()));
            }
        }

        let mut rows = Vec::with_capacity(values.len());
        for tuple in values {
            if tuple.len() != columns.len() {
                return Err(EngineError::ColumnCountMismatch {
                    columns: columns.len(),
                    values: tuple.len(),
                });
            }

            rows.push(Row::from_pairs(
                columns
                    .iter()
                    .zip(tuple)
                    .filter_map(|(column, value)| value.map(|v| (column.clone(), v))),
            ));
        }

        // NULL values leave the row without the key, so register the named columns
        // up front.
        for column in columns.iter() {
            table.register_column(column);
        }

        let n_inserted = rows.len();
        for row in rows {
            table.insert(row);
        }
        debug!("inserted {} row(s) into {}", n_inserted, table_name);

        Ok(SqlResult::processed(n_inserted))
    }
}

fn compare_rows(a: &Row, b: &Row, keys: &[OrderKey]) -> Ordering {
    keys.iter()
        .map(|key| {
            let ordering = compare_optional(a.get(&key.column), b.get(&key.column));
            if key.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn resolve_alias(key: &OrderKey, projection: &Projection) -> OrderKey {
    //! An ORDER BY key naming a select alias sorts by the aliased column. Rows are
    //! ordered before projection, so the key has to point at the source column.

    let source = match projection {
        Projection::Columns(columns) => columns
            .iter()
            .find(|c| c.alias.as_deref() == Some(key.column.as_str()))
            .map(|c| c.name.clone()),
        _ => None,
    };

    OrderKey {
        column: source.unwrap_or_else(|| key.column.clone()),
        ascending: key.ascending,
    }
}

fn check_labels(projection: &Projection) -> Result<()> {
    //! Result rows are keyed by output label, so two items with the same label
    //! would overwrite each other.

    let labels: Vec<String> = match projection {
        Projection::All => vec![],
        Projection::Columns(columns) => columns.iter().map(|c| c.label().to_string()).collect(),
        Projection::Aggregates(calls) => calls.iter().map(|call| call.label()).collect(),
    };

    let mut seen = IndexSet::new();
    for label in labels {
        if seen.contains(&label) {
            return Err(EngineError::DuplicateColumn(label));
        }
        seen.insert(label);
    }

    Ok(())
}

fn check_predicate_columns(table: &Table, predicate: &Predicate) -> Result<()> {
    check_columns(table, predicate.columns())
}

fn check_columns<'c>(table: &Table, columns: impl IntoIterator<Item = &'c str>) -> Result<()> {
    for column in columns {
        if !table.has_column(column) {
            return Err(EngineError::UnknownColumn {
                table: table.name().to_string(),
                column: column.to_string(),
            });
        }
    }

    Ok(())
}

use log::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::persistence::Database;
use crate::sql::{ResultSet, SqlExecutor, SqlParser, SqlResult};

/// The in-process entry point: SQL text in, rows or row counts out.
///
/// An [`Engine`] owns one [`Database`] for its whole life. Dropping the engine
/// drops every table with it.
///
/// ```
/// use minisql_engine::Engine;
///
/// let mut engine = Engine::new();
/// engine.create_table("users", &["id", "name", "age"]).unwrap();
/// engine.execute("INSERT INTO users (id, name, age) VALUES (1, 'Alice', 30)").unwrap();
///
/// let rows = engine.query("SELECT name FROM users WHERE age >= 30").unwrap();
/// assert_eq!(rows.get(0, "name"), Some("Alice"));
/// ```
pub struct Engine {
    database: Database,
    parser: SqlParser,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Engine {
        Engine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Engine {
        Engine {
            database: Database::new(),
            parser: SqlParser::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn create_table(&mut self, name: &str, columns: &[&str]) -> Result<()> {
        //! Create an empty table without going through SQL.

        self.database
            .create_table(name, columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn execute(&mut self, sql: &str) -> Result<SqlResult> {
        //! Parse and run exactly one statement.

        let statement = self.parser.parse_single_sql(sql)?;
        SqlExecutor::new(&mut self.database).execute(statement)
    }

    pub fn execute_batch(&mut self, sql: &str) -> Result<Vec<SqlResult>> {
        //! Run every statement in `sql` in order.
        //!
        //! The whole text is parsed before anything runs, so a syntax error anywhere
        //! leaves the database untouched. A failure while running stops the batch;
        //! statements that already ran stay applied.

        let statements = self.parser.parse_sql(sql)?;
        debug!("running batch of {} statement(s)", statements.len());

        let mut executor = SqlExecutor::new(&mut self.database);
        statements
            .into_iter()
            .map(|statement| executor.execute(statement))
            .collect()
    }

    pub fn query(&mut self, sql: &str) -> Result<ResultSet> {
        //! Run one statement that is expected to return rows.

        self.execute(sql)?.rows.ok_or_else(|| {
            EngineError::Invalid("The statement does not return any rows.".to_string())
        })
    }
}

use sqlparser::parser::ParserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("Column count {columns} does not match value count {values}")]
    ColumnCountMismatch { columns: usize, values: usize },

    #[error("Invalid: {0}")]
    Invalid(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParserError> for EngineError {
    fn from(error: ParserError) -> Self {
        EngineError::Parse(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

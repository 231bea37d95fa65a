//! Statements as the engine understands them, lowered from the `sqlparser` AST.

use std::fmt::Display;

use indexmap::IndexMap;

use super::predicate::Predicate;
use crate::functions::aggregators::Aggregator;

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        rows: Vec<Vec<Option<String>>>,
    },
    Update {
        table: String,
        assignments: IndexMap<String, Option<String>>,
        filter: Option<Predicate>,
    },
    Delete {
        table: String,
        filter: Option<Predicate>,
    },
    CreateTable {
        name: String,
        columns: Vec<String>,
        if_not_exists: bool,
    },
    DropTable {
        names: Vec<String>,
        if_exists: bool,
    },
    ShowTables,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,
    pub table: String,
    pub filter: Option<Predicate>,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// What a SELECT hands back.
///
/// Plain columns and aggregate calls are not allowed together since there is no
/// GROUP BY to tie them.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<SelectColumn>),
    Aggregates(Vec<AggregateCall>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectColumn {
    pub name: String,
    pub alias: Option<String>,
}

/// A single argument to an aggregate call.
///
/// Works for cases like:
/// - COUNT(*)
/// - MIN(age)
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionArg {
    Wildcard,
    Column(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateCall {
    pub aggregator: Aggregator,
    pub arg: FunctionArg,
    pub alias: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderKey {
    pub column: String,
    pub ascending: bool,
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "SELECT",
            Statement::Insert { .. } => "INSERT",
            Statement::Update { .. } => "UPDATE",
            Statement::Delete { .. } => "DELETE",
            Statement::CreateTable { .. } => "CREATE TABLE",
            Statement::DropTable { .. } => "DROP TABLE",
            Statement::ShowTables => "SHOW TABLES",
        }
    }
}

impl SelectColumn {
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl AggregateCall {
    pub fn label(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => format!("{}({})", self.aggregator, self.arg),
        }
    }
}

impl Display for FunctionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Column(name) => write!(f, "{}", name),
            Self::Wildcard => write!(f, "*"),
        }
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items: Vec<String> = match self {
            Projection::All => vec!["*".to_string()],
            Projection::Columns(columns) => columns
                .iter()
                .map(|col| match &col.alias {
                    Some(alias) => format!("{} as {}", col.name, alias),
                    None => col.name.clone(),
                })
                .collect(),
            Projection::Aggregates(calls) => calls
                .iter()
                .map(|call| format!("{}({})", call.aggregator, call.arg))
                .collect(),
        };
        write!(f, "{}", items.join(", "))
    }
}

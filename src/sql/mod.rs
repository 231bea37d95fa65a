//! The query pipeline: text goes through [`SqlParser`] into a [`Statement`],
//! then [`SqlExecutor`] runs it against a database and returns a [`SqlResult`].

mod executor;
mod parser;
mod predicate;
mod result;
mod statement;

pub use executor::SqlExecutor;
pub use parser::SqlParser;
pub use predicate::{ComparisonOp, Operand, Predicate, compare_optional, compare_values};
pub use result::{ResultSet, SqlResult};
pub use statement::{
    AggregateCall, FunctionArg, OrderKey, Projection, SelectColumn, SelectStatement, Statement,
};

use std::fmt::Display;

use crate::error::Result;
use crate::persistence::Row;
use crate::sql::FunctionArg;

mod count;
mod max;
mod min;

const ALLOWED_AGGREGATORS: [&str; 3] = [count::AGGR_NAME, min::AGGR_NAME, max::AGGR_NAME];

/// The built-in aggregate functions. Each one folds the filtered rows of a SELECT
/// into a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregator {
    Count,
    Min,
    Max,
}

impl Aggregator {
    pub fn from_name(name: &str) -> Option<Aggregator> {
        //! A central registry for all aggregators.
        //!
        //! To add one, simply add another match arm.

        match name.to_uppercase().as_str() {
            count::AGGR_NAME => Some(Aggregator::Count),
            min::AGGR_NAME => Some(Aggregator::Min),
            max::AGGR_NAME => Some(Aggregator::Max),
            _ => None,
        }
    }

    pub fn run(&self, arg: &FunctionArg, rows: &[Row]) -> Result<Option<String>> {
        //! Fold `rows` into one value. `None` stands for NULL, which MIN and MAX
        //! return when no row carries the column.

        match self {
            Aggregator::Count => count::run(arg, rows),
            Aggregator::Min => min::run(arg, rows),
            Aggregator::Max => max::run(arg, rows),
        }
    }
}

pub fn is_allowed(name: &str) -> bool {
    ALLOWED_AGGREGATORS.contains(&name.to_uppercase().as_str())
}

impl Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Aggregator::Count => count::AGGR_NAME,
            Aggregator::Min => min::AGGR_NAME,
            Aggregator::Max => max::AGGR_NAME,
        };
        write!(f, "{}", name)
    }
}

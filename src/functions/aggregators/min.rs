/// Find the smallest value of a particular column.
use crate::error::{EngineError, Result};
use crate::persistence::Row;
use crate::sql::{FunctionArg, compare_values};

pub(super) const AGGR_NAME: &str = "MIN";

pub(super) fn run(arg: &FunctionArg, rows: &[Row]) -> Result<Option<String>> {
    let FunctionArg::Column(column) = arg else {
        return Err(EngineError::Invalid(format!(
            "{} strictly allows a single column.",
            AGGR_NAME
        )));
    };

    let min = rows
        .iter()
        .filter_map(|row| row.get(column))
        .min_by(|a, b| compare_values(a, b));

    Ok(min.map(str::to_string))
}

/// The COUNT(arg) aggregator.
///
/// Returns the number of rows for a wildcard, or the number of rows that carry a
/// value for the given column.
use crate::error::Result;
use crate::persistence::Row;
use crate::sql::FunctionArg;

pub(super) const AGGR_NAME: &str = "COUNT";

pub(super) fn run(arg: &FunctionArg, rows: &[Row]) -> Result<Option<String>> {
    let total_count = match arg {
        FunctionArg::Wildcard => rows.len(),
        FunctionArg::Column(column) => rows.iter().filter(|row| row.contains(column)).count(),
    };

    Ok(Some(total_count.to_string()))
}

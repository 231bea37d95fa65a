//! Storage is kept as plain in-memory structures:
//! - Row (an ordered column name to value mapping, values are raw strings)
//! - Table (an ordered list of rows plus the column names seen so far)
//! - Database (tables by name, in creation order)
//!

//  All modules of this lib
mod database;
mod row;
mod table;

//  External API
pub use database::Database;
pub use row::Row;
pub use table::{Table, TableReader};

//! The in-built functions a query can call.
//!
//! Only aggregators exist for now: COUNT(*), COUNT(col), MIN(col) and MAX(col).
//! They all run over the rows left after the WHERE clause and produce one row.

pub mod aggregators;

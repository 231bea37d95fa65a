//! A minimal in-process SQL engine over in-memory tables.
//!
//! SQL text is parsed by [`sql::SqlParser`], run by [`sql::SqlExecutor`] against a
//! [`persistence::Database`], and the caller gets a [`sql::SqlResult`] back. Most
//! users only need [`Engine`].

pub mod cli;
pub mod config;
mod engine;
pub mod error;
pub mod functions;
pub mod persistence;
pub mod sessions;
pub mod sql;

pub use config::{EngineConfig, OutputFormat};
pub use engine::Engine;
pub use error::EngineError;

//! The command line parser.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(name = "minisql")]
#[command(about = "A minimal in-process SQL engine over in-memory tables", long_about = None)]
pub struct CliParser {
    // Either run an interactive session or a batch of statements.
    #[arg(required = true)]
    pub mode: Option<CliMode>,

    // Read the batch from this file instead of stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    // Run these statements instead of reading a file or stdin.
    #[arg(short, long)]
    pub execute: Option<String>,

    // How result rows are printed; overrides MINISQL_OUTPUT.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    // How many commands the session remembers; overrides MINISQL_HISTORY_LIMIT.
    #[arg(long)]
    pub history_limit: Option<usize>,
}

#[derive(Clone, ValueEnum)]
pub enum CliMode {
    // Start a REPL client instance.
    Client,

    // Run the statements from --execute, --file or stdin and exit.
    Batch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_with_overrides() {
        let cli = CliParser::try_parse_from([
            "minisql",
            "batch",
            "--execute",
            "SHOW TABLES",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.mode, Some(CliMode::Batch)));
        assert_eq!(cli.execute.as_deref(), Some("SHOW TABLES"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn mode_is_required() {
        assert!(CliParser::try_parse_from(["minisql"]).is_err());
    }
}

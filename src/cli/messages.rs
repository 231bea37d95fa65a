//! General message formatting functions for prettifying the CLI.
//! Includes basic utility functions such as:
//!
//! - Highlight Text (make the text teal but not bold)
//! - System message formatting functions that produce the same
//! format messages.

use colored::Colorize;

use crate::cli::colors::MINISQL_TEAL;
use crate::error::EngineError;

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the theme color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(MINISQL_TEAL))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Write a system message on the command line, properly
    //! formatted, according to the command line theme.
    //!
    //! Takes in a source name (like 'system') and the message as a
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:7}", source_name.color(MINISQL_TEAL).bold());

    format!("[{}] {}", source_formatted, message)
}

pub fn error_message(error: &EngineError) -> String {
    //! Tag an engine error with the stage it came from.

    let source = match error {
        EngineError::Parse(_) | EngineError::Unsupported(_) => "parser",
        EngineError::Config(_) => "config",
        EngineError::Io(_) => "system",
        _ => "exctr",
    };

    system_message(source, format!("{}", error.to_string().red()))
}

//! The commands understood by the REPL.
//!
//! Once the user is inside the REPL, anything that is not one of these
//! commands is handed to the SQL engine:
//!
//! - SELECT cols* FROM table [WHERE ..] [ORDER BY ..] [LIMIT ..];
//! - INSERT INTO table [(cols*)] VALUES (values*)*;
//! - UPDATE table SET col = value* [WHERE ..];
//! - DELETE FROM table [WHERE ..];
//! - CREATE TABLE table (col type*); DROP TABLE table; SHOW TABLES;
//!
//! Here * means more than one such values separated by a comma.

pub(crate) const LAST_COMMAND_DELIMITER: char = '!';

pub(crate) const COMMANDS_LIST: [(&str, &str); 5] = [
    ("!", "execute the last command, add more to go further back"),
    ("help", "list all available commands"),
    ("history [n]", "list command history for this session"),
    ("tables", "list the tables of the database"),
    ("quit", "end the session; every table goes with it"),
];

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReplCommand {
    Help,
    History(Option<usize>),
    Tables,
    Quit,
    Recall(usize),
    Sql(String),
    Empty,
}

impl ReplCommand {
    pub(crate) fn parse(line: &str) -> ReplCommand {
        let line = line.trim();

        if !line.is_empty() && line.chars().all(|c| c == LAST_COMMAND_DELIMITER) {
            return ReplCommand::Recall(line.len());
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (None, _, _) => ReplCommand::Empty,
            (Some("help"), None, _) => ReplCommand::Help,
            (Some("tables"), None, _) => ReplCommand::Tables,
            (Some("quit" | "exit"), None, _) => ReplCommand::Quit,
            (Some("history"), None, _) => ReplCommand::History(None),
            (Some("history"), Some(n), None) if n.parse::<usize>().is_ok() => {
                ReplCommand::History(n.parse().ok())
            }
            _ => ReplCommand::Sql(line.to_string()),
        }
    }
}

//! The only point of truth for everything related to the current user
//! session in the engine. A session owns the [`Engine`] it talks to, and keeps
//! the command history of the command line.
//!
//! At the end of a session the history is discarded together with the engine
//! and all its tables.

use std::{collections::VecDeque, fmt::Display, time::SystemTime};

use chrono::{DateTime, Local};
use log::warn;

use crate::engine::Engine;
use crate::error::Result;
use crate::sql::SqlResult;

struct CommandHistory {
    command: String,
    command_time: SystemTime,
}

impl CommandHistory {
    pub fn command_time_string(&self) -> String {
        let datetime: DateTime<Local> = self.command_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.command_time_string(), self.command)
    }
}

pub struct Session {
    command_history: VecDeque<CommandHistory>,
    history_limit: usize,
    start_time: SystemTime,
    engine: Engine,
}

impl Session {
    pub fn client(engine: Engine) -> Session {
        //! Returns a new client session. The history limit is taken from the
        //! engine's configuration.

        let history_limit = engine.config().history_limit;

        Session {
            command_history: VecDeque::new(),
            history_limit,
            start_time: SystemTime::now(),
            engine,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn execute(&mut self, sql: &str) -> Result<SqlResult> {
        self.engine.execute(sql)
    }

    pub fn add_to_command_history(&mut self, command: &str) {
        //! Record a command. Once the limit is reached the oldest entry goes.

        if self.history_limit == 0 {
            return;
        }

        while self.command_history.len() >= self.history_limit {
            self.command_history.pop_front();
        }

        self.command_history.push_back(CommandHistory {
            command: command.to_string(),
            command_time: SystemTime::now(),
        });
    }

    pub fn start_time_string(&self) -> String {
        //! Convert the [`SystemTime`] object into a string representation
        //! to be more readable.

        let datetime: DateTime<Local> = self.start_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn command_history(&self, n_prev: Option<usize>) -> Vec<String> {
        //! The previously invoked commands, most recent first.
        //! Use `n_prev` to limit the number of commands you see.

        let limit = n_prev.unwrap_or(self.command_history.len());

        self.command_history
            .iter()
            .rev()
            .take(limit)
            .enumerate()
            .map(|(index, command)| format!("{:3} | {}", index + 1, command))
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.command_history.len()
    }

    pub fn get_last_command(&self, nth_back: usize) -> Option<&str> {
        //! Gets the `nth_back`-th last command from the history, 1 being the
        //! most recent one.

        if nth_back == 0 {
            warn!("asked for the 0th previous command");
            return None;
        }

        self.command_history
            .iter()
            .nth_back(nth_back - 1)
            .map(|cmd| cmd.command.as_str())
    }
}

use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use colored::Colorize;
use log::{debug, warn};

use crate::{
    cli::{
        colors::MINISQL_TEAL,
        commands::{COMMANDS_LIST, ReplCommand},
        messages::{error_message, highlight_argument, system_message},
    },
    config::{EngineConfig, OutputFormat},
    engine::Engine,
    error::{EngineError, Result},
    sessions::Session,
    sql::SqlResult,
};

mod colors;
mod commands;
mod messages;
pub mod parsers;
mod splash_screen;

pub use parsers::{CliMode, CliParser};

pub fn run_client(config: EngineConfig) -> Result<()> {
    splash_screen::splash_screen();

    let output_format = config.output_format;
    let session = Session::client(Engine::with_config(config));

    println!(
        "{}",
        system_message(
            "info",
            "An empty in-memory database was created for this session.".to_string()
        )
    );

    start_repl(session, output_format)
}

pub fn run_batch(config: EngineConfig, file: Option<&Path>, execute: Option<&str>) -> Result<()> {
    //! Run a whole script and print every result. Stops at the first failing
    //! statement and hands its error back.

    let script = match (execute, file) {
        (Some(sql), _) => sql.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let output_format = config.output_format;
    let mut engine = Engine::with_config(config);

    for result in engine.execute_batch(&script)? {
        print_result(&result, output_format)?;
    }

    Ok(())
}

pub fn show_help() {
    println!(
        "{}",
        system_message(
            "info",
            format!(
                "Any other statements are considered {}.",
                highlight_argument("sql statements")
            )
        )
    );

    println!();
    println!("{:12} {}", "COMMAND".color(MINISQL_TEAL), "DETAILS");
    for (command, details) in COMMANDS_LIST {
        println!("{:12} {}", command.color(MINISQL_TEAL), details)
    }
}

fn print_result(result: &SqlResult, output_format: OutputFormat) -> Result<()> {
    match (&result.rows, output_format) {
        (Some(rows), OutputFormat::Table) => println!("{}", rows),
        (Some(rows), OutputFormat::Json) => {
            let json = serde_json::to_string_pretty(rows)
                .map_err(|e| EngineError::Invalid(format!("cannot render rows as JSON: {}", e)))?;
            println!("{}", json)
        }
        (None, OutputFormat::Json) => println!(
            "{}",
            serde_json::json!({ "n_rows_processed": result.n_rows_processed })
        ),
        (None, OutputFormat::Table) => {}
    }

    Ok(())
}

fn start_repl(mut session: Session, output_format: OutputFormat) -> Result<()> {
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Use '{}' to leave and '{}' to know all commands available.",
                highlight_argument("quit"),
                highlight_argument("help"),
            ),
        )
    );
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "New session initiated at '{}'.",
                highlight_argument(&session.start_time_string())
            ),
        )
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        print!("{:7} > ", "minisql".color(MINISQL_TEAL).bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let mut command = ReplCommand::parse(&line?);

        if let ReplCommand::Recall(steps) = command {
            match session.get_last_command(steps) {
                Some(previous) => {
                    println!("{}", system_message("system", highlight_argument(previous)));
                    command = ReplCommand::parse(previous);
                }
                None => {
                    println!(
                        "{}",
                        system_message(
                            "system",
                            format!(
                                "No command {} steps back.",
                                highlight_argument(&steps.to_string())
                            ),
                        )
                    );
                    continue;
                }
            }
        }

        match command {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => show_help(),
            ReplCommand::History(n_prev) => {
                for line in session.command_history(n_prev) {
                    println!("{}", line);
                }
            }
            ReplCommand::Tables => {
                let names = session.engine().database().table_names();
                if names.is_empty() {
                    println!("There are no tables in this database.");
                } else {
                    println!("There are {} tables in this database.", names.len());
                    for (index, name) in names.iter().enumerate() {
                        println!("{:5}. {:10}", index + 1, name);
                    }
                }
            }
            ReplCommand::Sql(sql) => {
                session.add_to_command_history(&sql);

                match session.execute(&sql) {
                    Ok(result) => {
                        print_result(&result, output_format)?;
                        println!(
                            "{}",
                            system_message(
                                "minisql",
                                format!("{} row(s) processed!", result.n_rows_processed)
                            )
                        );
                    }
                    Err(error) => {
                        debug!("statement failed: {:?}", error);
                        println!("{}", error_message(&error));
                    }
                }
            }
            ReplCommand::Recall(_) => warn!("nested recall ignored"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};
use minisql_engine::EngineConfig;
use minisql_engine::cli::{self, CliMode, CliParser};

fn main() -> ExitCode {
    let args = CliParser::parse();

    let mut config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("err: {}", message);
            return ExitCode::FAILURE;
        }
    };

    if let Some(format) = args.format {
        config.output_format = format;
    }
    if let Some(history_limit) = args.history_limit {
        config.history_limit = history_limit;
    }

    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();
    debug!("starting with {:?}", config);

    let outcome = match args.mode {
        Some(CliMode::Client) => cli::run_client(config),
        Some(CliMode::Batch) => cli::run_batch(config, args.file.as_deref(), args.execute.as_deref()),
        None => Ok(()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{:?}", message);
            eprintln!("err: {}", message);
            ExitCode::FAILURE
        }
    }
}

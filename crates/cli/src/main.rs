use clap::Parser;
use cmdmatch_cli::cli_args::Args;
use cmdmatch_cli::output;
use cmdmatch_core::config;
use cmdmatch_core::error::Result;
use cmdmatch_core::file_handling;
use log::{debug, info};
use std::process::ExitCode;

fn execute() -> Result<ExitCode> {
    let args = Args::parse();

    let definitions_path = config::get_definitions_path(&args.config_path);
    debug!("Definitions path: `{}`", definitions_path);

    let commands = file_handling::get_command_definitions(&definitions_path)?;

    if args.list {
        for line in output::list_commands(&commands) {
            println!("{line}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let dispatcher = args.dispatcher()?;

    match dispatcher.dispatch(&commands)? {
        Some(parsed) => {
            print!("{}", output::render_parsed(&parsed)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let name = args.tokens.first().map_or("", String::as_str);
            info!("Nothing to do for `{name}`");
            eprintln!("No command matched `{name}`.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use clap::Parser;
use repocommon::prelude::*;

mod cli;
mod cmd_junit;
mod cmd_ping;
mod cmd_stdoutinfo;
mod config;
mod error;

use cli::{Cli, Command};
use error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.apply_print_options();

    match main_internal(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.is_trace_on() {
                eprintln!("error: {:?}", e);
            } else {
                errorln!("Error", "{}", e);
                hintln!("Consider", "Run with `--trace` to see the full error report");
            }
            ExitCode::FAILURE
        }
    }
}

fn main_internal(cli: &Cli) -> Result<ExitCode, Error> {
    match &cli.command {
        Command::Ping(options) => cmd_ping::run(&cli.top, options)?,
        Command::Junit(_) => return cmd_junit::run(),
        Command::Stdoutinfo(_) => cmd_stdoutinfo::run()?,
    }

    Ok(ExitCode::SUCCESS)
}

mod cli;
mod config;
mod convert;
mod logging;
mod map_cmd;
mod members_cmd;
mod series_cmd;
mod verify_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Verify(args) => verify_cmd::run(args),
        Command::Map(args) => map_cmd::run(args),
        Command::Series(args) => series_cmd::run(args),
        Command::Members(args) => members_cmd::run(args),
    }
}

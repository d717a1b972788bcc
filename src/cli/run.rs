//! Dispatch parsed arguments to the command handlers.
use std::env;

use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, extract::extract, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to get current directory")?;

    match command {
        Some(Command::Extract(cmd)) => extract(cmd, &cwd),
        Some(Command::Init) => init(&cwd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}

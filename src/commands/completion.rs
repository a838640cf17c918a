use std::io;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::Cli;

/// Write a completion script for the requested shell to stdout.
pub fn run(shell: Shell) {
    generate(shell, &mut Cli::command(), "venvup", &mut io::stdout());
}

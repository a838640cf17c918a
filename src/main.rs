#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::{env, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

mod catalog;
mod command;
mod commands;
mod config;
mod constants;
mod error;
mod progress;
mod pyenv;
mod requirements;
mod ui;
mod venv;

use crate::{
    config::ProjectConfig,
    constants::SETUP_DIR,
    error::{Error, Result},
    pyenv::Pyenv,
};

#[derive(Parser)]
#[command(
    name = "venvup",
    version,
    about = "Provision per-project Python virtual environments."
)]
struct Cli {
    /// Project root to operate on. Falls back to discovery if omitted.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::DirPath)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a Python version, rebuild `.venv`, and install requirements.
    Provision {
        /// Python version to provision instead of the recorded one.
        #[arg(short, long, value_name = "VERSION")]
        python: Option<String>,
    },
    /// List interpreter versions the version manager can install.
    #[command(alias = "ls")]
    Versions {
        /// Output the catalog as JSON instead of a plain listing.
        #[arg(long = "json")]
        json: bool,
        /// Optional substring to filter version identifiers.
        #[arg(value_name = "FILTER")]
        filter: Option<String>,
    },
    /// Remove the project's virtual environment.
    Clean,
    /// Completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Provision { python } => {
            let root = locate_project_root(cli.root.as_ref())?;
            let config = ProjectConfig::load(root, python)?;
            commands::provision::run(&config)
        }
        Commands::Versions { json, filter } => {
            let pyenv = Pyenv::new(&config::pyenv_root()?);
            commands::versions::run(&pyenv, filter.as_deref(), json)
        }
        Commands::Clean => {
            let root = locate_project_root(cli.root.as_ref())?;
            commands::clean::run(&root)
        }
        Commands::Completions { shell } => {
            commands::completion::run(shell);
            Ok(())
        }
    }
}

/// Determine the project root without requiring the caller to pass it.
///
/// An explicit `--root` must contain the `setup/` sub-folder. Otherwise the
/// current directory is used when it contains `setup/`, or its parent when
/// the current directory IS the `setup/` folder. Anything else is an invalid
/// layout, rejected before any external command runs.
fn locate_project_root(root_arg: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = root_arg {
        return validate_root(path.clone());
    }

    let cwd = env::current_dir().map_err(|source| Error::Inspect {
        path: PathBuf::from("."),
        source,
    })?;

    if cwd.file_name().is_some_and(|name| name == SETUP_DIR) {
        if let Some(parent) = cwd.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    validate_root(cwd)
}

fn validate_root(root: PathBuf) -> Result<PathBuf> {
    if root.join(SETUP_DIR).is_dir() {
        Ok(root)
    } else {
        Err(Error::InvalidLayout(format!(
            "{} does not contain a `{SETUP_DIR}` folder",
            root.display()
        )))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = run_command(cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn explicit_root_must_contain_the_setup_folder() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(SETUP_DIR)).unwrap();

        let root = locate_project_root(Some(&dir.path().to_path_buf())).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn rejects_roots_without_the_setup_folder() {
        let dir = tempdir().unwrap();

        let err = locate_project_root(Some(&dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout(_)));
    }
}

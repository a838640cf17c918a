//! Virtual environment paths and creation.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    catalog::PythonVersion,
    command::ManagedCommand,
    constants::VENV_DIR,
    error::Result,
    progress::{ProgressLogger, StepId},
    pyenv::Pyenv,
};

/// Path of the project's virtual environment directory.
#[must_use]
pub fn venv_dir(root: &Path) -> PathBuf {
    root.join(VENV_DIR)
}

/// Path of the environment's own package installer.
#[must_use]
pub fn venv_pip(root: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir(root).join("Scripts").join("pip.exe")
    } else {
        venv_dir(root).join("bin").join("pip")
    }
}

/// Create the virtual environment at `<root>/.venv`.
///
/// Any prior contents are discarded and the seeded packaging tools are
/// upgraded. A failure leaves whatever the interpreter wrote behind; the
/// next run replaces it.
///
/// # Errors
///
/// Returns an error if the interpreter cannot be spawned or creation fails.
pub fn create(
    root: &Path,
    pyenv: &Pyenv,
    version: &PythonVersion,
    sink: &Arc<dyn ProgressLogger>,
    step_id: StepId,
) -> Result<()> {
    ManagedCommand::new("python", step_id, Arc::clone(sink))
        .envs(pyenv.selection_env(version))
        .args(["-m", "venv", "--clear", "--upgrade-deps"])
        .arg(venv_dir(root))
        .run_checked("python -m venv")
}

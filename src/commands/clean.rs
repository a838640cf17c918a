use std::{fs, path::Path};

use crate::{
    error::{Error, Result},
    ui, venv,
};

/// Remove the project's virtual environment directory.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub fn run(root: &Path) -> Result<()> {
    let target = venv::venv_dir(root);
    ui::step(format!("Cleaning {}", target.display()));

    if !target.is_dir() {
        ui::detail("No virtual environment found, nothing to clean.");
        ui::blank_line();
        return Ok(());
    }

    fs::remove_dir_all(&target).map_err(|source| Error::Remove {
        path: target.clone(),
        source,
    })?;
    ui::detail("Removed.");
    ui::blank_line();
    Ok(())
}

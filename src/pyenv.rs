//! Client for the pyenv version manager CLI.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use crate::{
    catalog::{self, PythonVersion, VersionCatalog},
    command::ManagedCommand,
    error::{Error, Result},
    progress::{ProgressLogger, StepId},
};

/// Handle to a pyenv installation rooted at a fixed directory.
pub struct Pyenv {
    search_path: OsString,
}

impl Pyenv {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            search_path: extended_path(root),
        }
    }

    /// Install the requested interpreter, skipping silently when it is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns an error if pyenv cannot be spawned or the install fails.
    pub fn ensure_installed(
        &self,
        version: &PythonVersion,
        sink: &Arc<dyn ProgressLogger>,
        step_id: StepId,
    ) -> Result<()> {
        ManagedCommand::new("pyenv", step_id, Arc::clone(sink))
            .env("PATH", &self.search_path)
            .arg("install")
            .arg("--skip-existing")
            .arg(version.as_str())
            .run_checked("pyenv install")
    }

    /// Environment entries that select `version` for commands resolved
    /// through the manager's shims. Applied per command, so nothing ambient
    /// needs restoring afterwards.
    #[must_use]
    pub fn selection_env(&self, version: &PythonVersion) -> Vec<(OsString, OsString)> {
        vec![
            (OsString::from("PATH"), self.search_path.clone()),
            (
                OsString::from("PYENV_VERSION"),
                OsString::from(version.as_str()),
            ),
        ]
    }
}

impl VersionCatalog for Pyenv {
    fn installable(&self) -> Result<Vec<PythonVersion>> {
        let output = Command::new("pyenv")
            .env("PATH", &self.search_path)
            .arg("install")
            .arg("--list")
            .output()
            .map_err(|source| Error::Spawn {
                program: "pyenv".to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: "pyenv install --list".to_string(),
                status: output.status,
            });
        }
        Ok(catalog::parse_catalog_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// PATH value with the manager's shim and bin directories prepended, so its
/// executables and shims win resolution for child commands.
fn extended_path(root: &Path) -> OsString {
    let mut paths: Vec<PathBuf> = vec![root.join("shims"), root.join("bin")];
    if let Some(current) = env::var_os("PATH") {
        paths.extend(env::split_paths(&current));
    }
    env::join_paths(paths).unwrap_or_else(|_| env::var_os("PATH").unwrap_or_default())
}

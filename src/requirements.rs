//! Discovery and installation of requirements files.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    command::ManagedCommand,
    config::ProjectConfig,
    constants::REQUIREMENTS_STEM,
    error::{Error, Result},
    progress::{ProgressLogger, StepId},
    ui, venv,
};

/// True for file names like `requirements.txt` or `dev-requirements.text`:
/// the stem contains `requirements` and the extension starts with `t`.
#[must_use]
pub fn is_requirements_file(name: &str) -> bool {
    let path = Path::new(name);
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return false;
    };
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    stem.contains(REQUIREMENTS_STEM) && extension.starts_with('t')
}

/// Requirements files directly under `dir`, in directory enumeration order.
/// The order between multiple matches is whatever the filesystem yields.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| Error::Inspect {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|source| Error::Inspect {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| Error::Inspect {
            path: entry.path(),
            source,
        })?;
        if !file_type.is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(is_requirements_file)
        {
            found.push(entry.path());
        }
    }

    Ok(found)
}

/// Install every discovered requirements file into the project's
/// environment: project-root files first, then the shared templates.
/// Stops at the first failing install; earlier installs stay in place.
///
/// Returns the number of files installed.
///
/// # Errors
///
/// Returns an error if discovery fails or an install command fails.
pub fn install_all(config: &ProjectConfig, sink: &Arc<dyn ProgressLogger>) -> Result<usize> {
    let mut queue = discover(&config.root)?;
    if let Some(templates) = config.templates_dir() {
        if templates.is_dir() {
            queue.extend(discover(&templates)?);
        }
    }

    let pip = venv::venv_pip(&config.root);
    for file in &queue {
        ui::detail(format!("Installing {}", file.display()));
        install_file(&pip, file, config, sink)?;
    }

    Ok(queue.len())
}

fn install_file(
    pip: &Path,
    file: &Path,
    config: &ProjectConfig,
    sink: &Arc<dyn ProgressLogger>,
) -> Result<()> {
    let step_id = StepId::new(format!("pip install -r {}", file.display()));
    ManagedCommand::new(pip, step_id, Arc::clone(sink))
        .envs(&config.install_env)
        .arg("install")
        .arg("-r")
        .arg(file)
        .run_checked("pip install")
}

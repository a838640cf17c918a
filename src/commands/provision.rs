//! The end-to-end provisioning pipeline: resolve a Python version, ensure it
//! is installed, rebuild `.venv`, and install discovered requirements.

use std::{fs, io, path::Path, sync::Arc};

use itertools::Itertools;

use crate::{
    catalog::{self, PythonVersion, VersionCatalog},
    config::ProjectConfig,
    error::{Error, Result},
    progress::{PlainProgressLogger, ProgressLogger, StepGuard, StepId},
    pyenv::Pyenv,
    requirements, ui, venv,
};

/// Where the resolved version came from.
enum VersionSource {
    Requested,
    Recorded,
    Latest,
}

/// Run the full provisioning workflow against the configured project root.
///
/// # Errors
///
/// Returns an error if version resolution, the interpreter install, the
/// environment build, or a requirements install fails. No partial-state
/// cleanup is attempted; the next run rebuilds the environment from scratch.
pub fn run(config: &ProjectConfig) -> Result<()> {
    let pyenv = Pyenv::new(&config.pyenv_root);
    let sink: Arc<dyn ProgressLogger> = Arc::new(PlainProgressLogger::default());

    let (_, guard) = begin_step(&sink, "resolve-version", "Resolving Python version");
    let (version, source) = resolve_version(config, &pyenv)?;
    match source {
        VersionSource::Recorded => guard.cached(),
        VersionSource::Requested | VersionSource::Latest => guard.done(),
    }

    let (step_id, guard) = begin_step(
        &sink,
        "install-python",
        &format!("Installing Python {version}"),
    );
    pyenv.ensure_installed(&version, &sink, step_id)?;
    guard.done();

    let venv_path = venv::venv_dir(&config.root);
    let (step_id, guard) = begin_step(
        &sink,
        "create-venv",
        &format!("Creating {} with Python {version}", venv_path.display()),
    );
    venv::create(&config.root, &pyenv, &version, &sink, step_id)?;
    guard.done();

    let (_, guard) = begin_step(&sink, "install-requirements", "Installing requirements");
    if !config.install_env.is_empty() {
        ui::detail(format!(
            "Installer environment: {}",
            config
                .install_env
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .join(" ")
        ));
    }
    let installed = requirements::install_all(config, &sink)?;
    if installed == 0 {
        ui::detail("No requirements files were found.");
    }
    guard.done();

    ui::step(format!("Environment ready at {}", venv_path.display()));
    Ok(())
}

/// Register a step with the sink and return its id plus a failure guard.
fn begin_step(sink: &Arc<dyn ProgressLogger>, id: &str, label: &str) -> (StepId, StepGuard) {
    let id = StepId::new(id);
    sink.register_step(&id, label);
    sink.start(&id);
    let guard = StepGuard::new(Arc::clone(sink), id.clone());
    (id, guard)
}

/// Decide which Python version to provision and keep the version record in
/// sync with the decision.
///
/// Priority: explicit request, then the recorded version, then the newest
/// catalog entry. An explicit request is catalog-completed and, when
/// completion changes it, re-recorded; a recorded version is honored
/// verbatim without consulting the catalog.
fn resolve_version(
    config: &ProjectConfig,
    catalog_source: &dyn VersionCatalog,
) -> Result<(PythonVersion, VersionSource)> {
    let record_path = config.version_file();

    if let Some(request) = &config.python_override {
        let resolved = catalog::resolve(catalog_source, request)?;
        if resolved.as_str() == request {
            ui::detail(format!("Using requested Python {resolved}"));
        } else {
            ui::detail(format!("Requested Python {request} resolved to {resolved}"));
            write_record(&record_path, &resolved)?;
        }
        return Ok((resolved, VersionSource::Requested));
    }

    if let Some(recorded) = read_record(&record_path)? {
        ui::detail(format!("Using recorded Python {recorded}"));
        return Ok((PythonVersion::new(recorded), VersionSource::Recorded));
    }

    let newest = catalog::latest(catalog_source)?;
    ui::detail(format!("Nothing requested or recorded; using latest {newest}"));
    write_record(&record_path, &newest)?;
    Ok((newest, VersionSource::Latest))
}

fn read_record(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_record(path: &Path, version: &PythonVersion) -> Result<()> {
    fs::write(path, format!("{version}\n")).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    ui::detail(format!("Recorded {version} in {}", path.display()));
    Ok(())
}

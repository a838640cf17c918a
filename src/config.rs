use std::{
    env, fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;

use crate::{
    constants::{CONFIG_FILE, PYENV_ROOT_ENV, TEMPLATES_ROOT_ENV, TEMPLATES_SUBDIR, VERSION_FILE},
    error::{Error, Result},
};

/// Everything a provisioning run needs to know about its surroundings.
pub struct ProjectConfig {
    pub root: PathBuf,
    /// Explicit version request, CLI flag first, then the config file.
    pub python_override: Option<String>,
    /// Extra environment variables applied to installer commands.
    pub install_env: IndexMap<String, String>,
    pub pyenv_root: PathBuf,
}

impl ProjectConfig {
    /// Combine the CLI arguments with `venvup.toml` from the project root.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or malformed, or if
    /// the pyenv root cannot be determined.
    pub fn load(root: PathBuf, cli_python: Option<String>) -> Result<Self> {
        let settings = load_settings(&root)?;
        let pyenv_root = pyenv_root()?;
        Ok(Self {
            python_override: cli_python.or(settings.python),
            install_env: settings.install_env,
            root,
            pyenv_root,
        })
    }

    /// Path of the persisted version record.
    #[must_use]
    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    /// The editor's shared templates directory, when the portable root is set.
    #[must_use]
    pub fn templates_dir(&self) -> Option<PathBuf> {
        env::var_os(TEMPLATES_ROOT_ENV).map(|base| PathBuf::from(base).join(TEMPLATES_SUBDIR))
    }
}

/// Locate the pyenv installation root (`$PYENV_ROOT`, else `~/.pyenv`).
///
/// # Errors
///
/// Returns an error if neither the variable nor a home directory is available.
pub fn pyenv_root() -> Result<PathBuf> {
    if let Some(root) = env::var_os(PYENV_ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }
    home::home_dir()
        .map(|home| home.join(".pyenv"))
        .ok_or(Error::NoHomeDir)
}

/// Settings read from `venvup.toml`.
#[derive(Default)]
struct FileSettings {
    python: Option<String>,
    install_env: IndexMap<String, String>,
}

fn load_settings(root: &Path) -> Result<FileSettings> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(FileSettings::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|source| Error::ReadFile {
        path: config_path.clone(),
        source,
    })?;
    let parsed: toml::Value = toml::from_str(&contents).map_err(|source| Error::ParseConfig {
        path: config_path.clone(),
        source,
    })?;

    let python = match parsed.get("python") {
        None => None,
        Some(value) => Some(
            value
                .as_str()
                .ok_or_else(|| Error::ConfigKey {
                    key: "python".to_string(),
                })?
                .to_string(),
        ),
    };

    let env_table = parsed.get("env").and_then(|val| val.get("install"));
    let install_env = parse_env_table(env_table, "env.install")?;

    Ok(FileSettings {
        python,
        install_env,
    })
}

fn parse_env_table(
    value: Option<&toml::Value>,
    section_name: &str,
) -> Result<IndexMap<String, String>> {
    let mut env = IndexMap::new();

    let Some(val) = value else {
        return Ok(env);
    };

    let Some(table) = val.as_table() else {
        return Err(Error::ConfigEnvTable {
            section: section_name.to_string(),
        });
    };

    for (key, val) in table {
        let Some(val_str) = val.as_str() else {
            return Err(Error::ConfigEnvTable {
                section: format!("{section_name}.{key}"),
            });
        };
        env.insert(key.clone(), val_str.to_string());
    }

    Ok(env)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn defaults_when_no_config_file_exists() {
        let dir = tempdir().unwrap();
        let settings = load_settings(dir.path()).unwrap();
        assert!(settings.python.is_none());
        assert!(settings.install_env.is_empty());
    }

    #[test]
    fn reads_python_and_install_env() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "python = \"3.11\"\n\n[env.install]\nPIP_INDEX_URL = \"https://mirror/simple\"\n",
        )
        .unwrap();

        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.python.as_deref(), Some("3.11"));
        assert_eq!(
            settings.install_env.get("PIP_INDEX_URL").map(String::as_str),
            Some("https://mirror/simple")
        );
    }

    #[test]
    fn rejects_non_string_python() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "python = 3\n").unwrap();

        assert!(matches!(
            load_settings(dir.path()),
            Err(Error::ConfigKey { .. })
        ));
    }

    #[test]
    fn rejects_non_string_env_values() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[env.install]\nRETRIES = 3\n").unwrap();

        assert!(matches!(
            load_settings(dir.path()),
            Err(Error::ConfigEnvTable { .. })
        ));
    }
}

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a venvup run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid folder structure: {0}")]
    InvalidLayout(String),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{section} in venvup.toml must be a table of string key/value pairs")]
    ConfigEnvTable { section: String },

    #[error("`{key}` in venvup.toml must be a string")]
    ConfigKey { key: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("the version manager reported no installable versions")]
    EmptyCatalog,

    #[error("no installable version matches `{0}`")]
    NoMatchingVersion(String),

    #[error("could not determine the user home directory")]
    NoHomeDir,

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

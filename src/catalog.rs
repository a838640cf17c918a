//! Typed access to the version manager's catalog of installable versions.
//!
//! Isolates the assumptions about `pyenv install --list` output so they can
//! be pinned with fixtures instead of leaking into the provisioning flow.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A Python version identifier exactly as the version manager reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PythonVersion(String);

impl PythonVersion {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of installable version identifiers, in the manager's own order
/// (oldest first, newest last).
pub trait VersionCatalog {
    /// List every installable version known to the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn installable(&self) -> Result<Vec<PythonVersion>>;
}

/// Resolve a requested version against the catalog.
///
/// The request is matched by substring and the last matching entry wins, so a
/// bare `3.12` resolves to the newest `3.12.x` the manager knows about while
/// a fully pinned `3.12.4` resolves to itself.
///
/// # Errors
///
/// Returns an error if the catalog cannot be queried or nothing matches.
pub fn resolve(catalog: &dyn VersionCatalog, request: &str) -> Result<PythonVersion> {
    catalog
        .installable()?
        .into_iter()
        .rev()
        .find(|version| version.as_str().contains(request))
        .ok_or_else(|| Error::NoMatchingVersion(request.to_string()))
}

/// The most recent version the manager knows about (the final catalog entry).
///
/// # Errors
///
/// Returns an error if the catalog cannot be queried or is empty.
pub fn latest(catalog: &dyn VersionCatalog) -> Result<PythonVersion> {
    catalog.installable()?.pop().ok_or(Error::EmptyCatalog)
}

/// Parse `pyenv install --list` output into version identifiers.
///
/// Header lines end with a colon and are skipped; every other line
/// contributes its last whitespace-delimited token. The catalog's own
/// ordering is preserved.
#[must_use]
pub fn parse_catalog_output(output: &str) -> Vec<PythonVersion> {
    output
        .lines()
        .filter(|line| !line.trim_end().ends_with(':'))
        .filter_map(|line| line.split_whitespace().next_back())
        .map(PythonVersion::new)
        .collect()
}

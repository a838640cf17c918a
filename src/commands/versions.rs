//! List the interpreter versions the version manager can install.

use serde::Serialize;
use serde_json::to_string_pretty;

use crate::{
    catalog::{PythonVersion, VersionCatalog},
    error::Result,
    ui,
};

#[derive(Serialize)]
struct CatalogListing<'a> {
    versions: &'a [PythonVersion],
    latest: Option<&'a PythonVersion>,
}

/// Print the installable catalog, optionally filtered by substring, as a
/// plain listing or JSON.
///
/// # Errors
///
/// Returns an error if the catalog cannot be queried or serialized.
pub fn run(catalog: &dyn VersionCatalog, filter: Option<&str>, json: bool) -> Result<()> {
    let mut versions = catalog.installable()?;
    if let Some(filter) = filter {
        versions.retain(|version| version.as_str().contains(filter));
    }

    if json {
        let listing = CatalogListing {
            versions: &versions,
            latest: versions.last(),
        };
        println!("{}", to_string_pretty(&listing)?);
        return Ok(());
    }

    if versions.is_empty() {
        ui::detail("No installable versions matched.");
        return Ok(());
    }

    ui::print_catalog(&versions);
    Ok(())
}

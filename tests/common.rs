//! Shared helpers for driving the venvup binary against fixture projects
//! with a fake pyenv/python/pip toolchain that logs its invocations.

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use tempfile::TempDir;

pub const CATALOG: &str =
    "Available versions:\n  2.7.18\n  3.8.1\n  3.9\n  3.9.18\n  3.11.9\n  3.12.3\n";

const FAKE_PYENV: &str = r#"#!/bin/sh
echo "pyenv $*" >> "$VENVUP_TEST_LOG"
case "$1 $2" in
"install --list")
    cat "$VENVUP_TEST_CATALOG"
    ;;
esac
"#;

const FAKE_PYTHON: &str = r#"#!/bin/sh
echo "python $* PYENV_VERSION=${PYENV_VERSION:-}" >> "$VENVUP_TEST_LOG"
for arg; do target="$arg"; done
rm -rf "$target"
mkdir -p "$target/bin"
cp "$VENVUP_TEST_PIP" "$target/bin/pip"
chmod +x "$target/bin/pip"
"#;

const FAKE_PIP: &str = r#"#!/bin/sh
echo "pip $*" >> "$VENVUP_TEST_LOG"
echo "pip-env PIP_INDEX_URL=${PIP_INDEX_URL:-unset}" >> "$VENVUP_TEST_LOG"
case "$*" in
*broken*)
    exit 1
    ;;
esac
"#;

pub struct Fixture {
    pub temp: TempDir,
    pub project: PathBuf,
    bin: PathBuf,
    log: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("fixture tempdir");
        let project = temp.path().join("project");
        fs::create_dir_all(project.join("setup")).expect("project layout");

        let bin = temp.path().join("bin");
        fs::create_dir(&bin).expect("fake bin dir");
        let log = temp.path().join("invocations.log");
        fs::write(temp.path().join("catalog.txt"), CATALOG).expect("catalog fixture");

        write_executable(&bin.join("pyenv"), FAKE_PYENV);
        write_executable(&bin.join("python"), FAKE_PYTHON);
        write_executable(&temp.path().join("pip-template"), FAKE_PIP);

        Self {
            temp,
            project,
            bin,
            log,
        }
    }

    /// Command for the binary under test with the fake toolchain on PATH.
    pub fn venvup(&self) -> Command {
        let mut cmd = Command::cargo_bin("venvup").expect("venvup binary");
        let path = format!(
            "{}:{}",
            self.bin.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        cmd.current_dir(&self.project)
            .env("PATH", path)
            .env("PYENV_ROOT", self.temp.path().join("pyenv"))
            .env("VENVUP_TEST_LOG", &self.log)
            .env("VENVUP_TEST_CATALOG", self.temp.path().join("catalog.txt"))
            .env("VENVUP_TEST_PIP", self.temp.path().join("pip-template"))
            .env_remove("VSCODE_PORTABLE");
        cmd
    }

    /// Create the shared templates directory below a portable editor root.
    pub fn templates_dir(&self) -> PathBuf {
        let templates = self.portable_root().join("user-data").join("templates");
        fs::create_dir_all(&templates).expect("templates dir");
        templates
    }

    pub fn portable_root(&self) -> PathBuf {
        self.temp.path().join("portable")
    }

    pub fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn version_record(&self) -> Option<String> {
        fs::read_to_string(self.project.join(".python-version")).ok()
    }
}

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fake executable");
    let mut perms = fs::metadata(path)
        .expect("stat fake executable")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod fake executable");
}

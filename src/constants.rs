//! Fixed filesystem conventions used throughout venvup

/// Name of the virtual environment directory under the project root
pub const VENV_DIR: &str = ".venv";

/// Sub-folder a directory must contain to be recognized as a project root
pub const SETUP_DIR: &str = "setup";

/// File at the project root recording the resolved Python version
pub const VERSION_FILE: &str = ".python-version";

/// Substring a requirements file name must contain
pub const REQUIREMENTS_STEM: &str = "requirements";

/// Configuration file read from the project root
pub const CONFIG_FILE: &str = "venvup.toml";

/// Environment variable pointing at the editor's portable install root
pub const TEMPLATES_ROOT_ENV: &str = "VSCODE_PORTABLE";

/// Location of the shared templates directory below the portable root
pub const TEMPLATES_SUBDIR: &str = "user-data/templates";

/// Environment variable overriding the pyenv installation root
pub const PYENV_ROOT_ENV: &str = "PYENV_ROOT";

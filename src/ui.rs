use crossterm::style::{Color, Stylize};

use crate::catalog::PythonVersion;

/// Minimal helper for consistent CLI output.
pub fn step(message: impl AsRef<str>) {
    eprintln!("{} {}", "==>".bold().cyan(), message.as_ref());
}

/// Print a detail line associated with the latest step.
pub fn detail(message: impl AsRef<str>) {
    eprintln!("    {}", message.as_ref());
}

/// Insert a blank line to visually separate sections.
pub fn blank_line() {
    eprintln!();
}

/// Print the installable catalog in the manager's order, marking the most
/// recent entry.
pub fn print_catalog(versions: &[PythonVersion]) {
    let Some((newest, rest)) = versions.split_last() else {
        return;
    };
    for version in rest {
        println!("{version}");
    }
    println!(
        "{} {}",
        newest.as_str().bold().green(),
        "(latest)".with(Color::DarkGrey)
    );
}

//! Terminal output with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print integrity findings, one per line, each with a yellow marker
pub fn findings(text: &str) {
    for line in text.lines() {
        println!("{} {}", "✗".yellow(), line);
    }
}

/// Print data output (no color, safe to pipe)
pub fn data(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

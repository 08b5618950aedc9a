//! User interface functions for the CLI.
//! Contains helpers for the banner and terminal color detection.

use std::env;
use std::io::{self, IsTerminal};

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    // Avoid panics when the version exceeds the expected width
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │        ROOTCAUSE  PHP  SCANNER       │
    │                                      │
    │     Security analysis for PHP        │
    │     and Laravel projects             │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

/// Whether stdout should receive ANSI colors.
pub fn use_colored_output() -> bool {
    // NO_COLOR is the standard opt-out
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" || term == "unknown" {
            return false;
        }
    }
    if env::var("CI").is_ok() || env::var("CONTINUOUS_INTEGRATION").is_ok() {
        return false;
    }
    io::stdout().is_terminal()
}

//! Stderr `error:` / `note:` prefixes used by the binary.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

fn stderr_colors() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn prefix(text: &str, paint: fn(&str) -> String) -> String {
    if stderr_colors() {
        paint(text)
    } else {
        text.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

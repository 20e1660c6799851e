//! The boundary between probes and the machine they inspect.
//!
//! `Host` covers every OS interaction a probe needs: environment
//! variables, files and directories, globbing, readability, PATH lookup,
//! command output, and variables defined by a shell-sourced script.
//! Implementations absorb failures: a missing file, tool or permission
//! shows up as `None`, `false` or an empty collection, never as an error.
//!
//! - `live`: the real machine (`std::process::Command`, `glob`, `which`).
//! - `fake`: scripted host for tests.

pub mod live;

#[cfg(test)]
pub mod fake;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use live::LiveHost;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Captured result of a command that could be spawned.
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
        }
    }

    pub fn failed(stdout: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: stdout.into(),
        }
    }
}

pub trait Host {
    fn env_var(&self, name: &str) -> Option<String>;

    fn path_exists(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> Option<String>;

    /// Entry names of a directory; `None` when it is missing or unreadable.
    fn list_dir(&self, path: &Path) -> Option<Vec<String>>;

    /// Paths matching a glob pattern, sorted. Bad patterns match nothing.
    fn glob(&self, pattern: &str) -> Vec<PathBuf>;

    /// Whether the current user may read `path`, without opening it.
    fn is_readable(&self, path: &Path) -> bool;

    /// Whether `name` resolves to an executable on PATH.
    fn has_command(&self, name: &str) -> bool;

    /// Run a program to completion. `None` when it could not be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Option<CommandOutput>;

    /// Source `script` in a shell and report the non-empty values of
    /// `names` afterwards. Unset or empty variables are left out.
    fn sourced_vars(&self, script: &Path, names: &[&str]) -> HashMap<String, String>;
}

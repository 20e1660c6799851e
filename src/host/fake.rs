//! Scripted `Host` for tests.
//!
//! Commands are keyed by their full command line (`"lspci -d 1eff:"`).
//! A tool that is not registered with [`FakeHost::tool`] cannot be spawned.

use super::{CommandOutput, Host};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct FakeHost {
    env: HashMap<String, String>,
    files: HashMap<PathBuf, String>,
    dirs: HashMap<PathBuf, Vec<String>>,
    nodes: Vec<(PathBuf, bool)>,
    tools: HashSet<String>,
    outputs: HashMap<String, CommandOutput>,
    sourced: HashMap<String, String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn dir(mut self, path: &str, entries: &[&str]) -> Self {
        self.dirs
            .insert(path.into(), entries.iter().map(|e| e.to_string()).collect());
        self
    }

    /// A device node visible to globbing, readable or not.
    pub fn node(mut self, path: &str, readable: bool) -> Self {
        self.nodes.push((path.into(), readable));
        self
    }

    pub fn tool(mut self, name: &str) -> Self {
        self.tools.insert(name.into());
        self
    }

    /// Register a tool and the successful output of one of its command lines.
    pub fn output(mut self, cmdline: &str, stdout: &str) -> Self {
        self.register(cmdline, CommandOutput::ok(stdout));
        self
    }

    /// Like [`FakeHost::output`] with a nonzero exit status.
    pub fn failing(mut self, cmdline: &str, stdout: &str) -> Self {
        self.register(cmdline, CommandOutput::failed(stdout));
        self
    }

    pub fn sourced(mut self, name: &str, value: &str) -> Self {
        self.sourced.insert(name.into(), value.into());
        self
    }

    fn register(&mut self, cmdline: &str, out: CommandOutput) {
        if let Some(program) = cmdline.split_whitespace().next() {
            self.tools.insert(program.to_string());
        }
        self.outputs.insert(cmdline.to_string(), out);
    }
}

impl Host for FakeHost {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.dirs.contains_key(path)
            || self.nodes.iter().any(|(p, _)| p == path)
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn list_dir(&self, path: &Path) -> Option<Vec<String>> {
        self.dirs.get(path).cloned()
    }

    fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let Ok(pat) = glob::Pattern::new(pattern) else {
            return Vec::new();
        };
        let mut hits: Vec<PathBuf> = self
            .nodes
            .iter()
            .filter(|(p, _)| pat.matches_path(p))
            .map(|(p, _)| p.clone())
            .collect();
        hits.sort();
        hits
    }

    fn is_readable(&self, path: &Path) -> bool {
        self.nodes.iter().any(|(p, r)| p == path && *r) || self.files.contains_key(path)
    }

    fn has_command(&self, name: &str) -> bool {
        self.tools.contains(name)
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<CommandOutput> {
        if !self.tools.contains(program) {
            return None;
        }
        let mut key = program.to_string();
        for a in args {
            key.push(' ');
            key.push_str(a);
        }
        Some(
            self.outputs
                .get(&key)
                .cloned()
                .unwrap_or_else(|| CommandOutput::failed("")),
        )
    }

    fn sourced_vars(&self, script: &Path, names: &[&str]) -> HashMap<String, String> {
        if !self.files.contains_key(script) {
            return HashMap::new();
        }
        names
            .iter()
            .filter_map(|n| self.sourced.get(*n).map(|v| (n.to_string(), v.clone())))
            .collect()
    }
}

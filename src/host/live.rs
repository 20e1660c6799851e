//! `Host` backed by the running machine.

use super::{CommandOutput, Host};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Sources `$1`, then prints `NAME=value\0` for every remaining argument.
const SOURCE_SNIPPET: &str =
    r#". "$1" >/dev/null 2>&1; shift; for v in "$@"; do printf '%s=%s\0' "$v" "${!v}"; done"#;

fn shell_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LiveHost;

impl LiveHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for LiveHost {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!("read {} failed: {}", path.display(), e);
                None
            }
        }
    }

    fn list_dir(&self, path: &Path) -> Option<Vec<String>> {
        let entries = fs::read_dir(path).ok()?;
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Some(names)
    }

    fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let paths = match glob::glob(pattern) {
            Ok(p) => p,
            Err(e) => {
                warn!("invalid glob pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };
        let mut out: Vec<PathBuf> = paths.flatten().collect();
        out.sort();
        out
    }

    #[cfg(unix)]
    fn is_readable(&self, path: &Path) -> bool {
        use nix::unistd::{access, AccessFlags};
        access(path, AccessFlags::R_OK).is_ok()
    }

    #[cfg(not(unix))]
    fn is_readable(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    fn has_command(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<CommandOutput> {
        debug!("running {} {}", program, args.join(" "));
        match Command::new(program).args(args).output() {
            Ok(output) => {
                debug!("{} exited with {}", program, output.status);
                Some(CommandOutput {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                })
            }
            Err(e) => {
                debug!("could not spawn {}: {}", program, e);
                None
            }
        }
    }

    fn sourced_vars(&self, script: &Path, names: &[&str]) -> HashMap<String, String> {
        let valid: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| {
                let ok = shell_name_re().is_match(n);
                if !ok {
                    warn!("ignoring invalid shell variable name '{}'", n);
                }
                ok
            })
            .collect();
        if valid.is_empty() {
            return HashMap::new();
        }
        let script_arg = script.to_string_lossy().to_string();
        let mut args = vec!["-c", SOURCE_SNIPPET, "accelcheck", script_arg.as_str()];
        args.extend(valid.iter().copied());
        match self.run("bash", &args) {
            Some(out) => parse_nul_assignments(&out.stdout),
            None => HashMap::new(),
        }
    }
}

/// Parse `NAME=value\0` records, dropping empty values.
fn parse_nul_assignments(raw: &str) -> HashMap<String, String> {
    raw.split('\0')
        .filter_map(|rec| rec.split_once('='))
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.to_string(), v.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_command_is_absent() {
        let host = LiveHost::new();
        assert!(!host.has_command("accelcheck-nonexistent-tool-12345"));
        assert!(host.run("accelcheck-nonexistent-tool-12345", &[]).is_none());
    }

    #[test]
    fn test_list_dir_and_glob() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("node1"), "").unwrap();
        fs::write(dir.path().join("node0"), "").unwrap();
        fs::write(dir.path().join("other"), "").unwrap();
        let host = LiveHost::new();
        assert_eq!(
            host.list_dir(dir.path()).unwrap(),
            vec!["node0", "node1", "other"]
        );
        let pattern = dir.path().join("node*").to_string_lossy().to_string();
        let hits = host.glob(&pattern);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].ends_with("node0"));
        assert!(host.list_dir(&dir.path().join("missing")).is_none());
        assert!(host.glob("[").is_empty());
    }

    #[test]
    fn test_is_readable_on_plain_file() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("f");
        fs::write(&p, "x").unwrap();
        let host = LiveHost::new();
        assert!(host.is_readable(&p));
        assert!(!host.is_readable(&dir.path().join("nope")));
    }

    #[test]
    fn test_parse_nul_assignments() {
        let parsed = parse_nul_assignments("A=1.2\0B=\0C=x=y\0");
        assert_eq!(parsed.get("A").map(String::as_str), Some("1.2"));
        assert!(!parsed.contains_key("B"));
        assert_eq!(parsed.get("C").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn test_sourced_vars_rejects_bad_names() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("env.sh");
        fs::write(&script, "X=1\n").unwrap();
        let host = LiveHost::new();
        assert!(host.sourced_vars(&script, &["$(id)", "1BAD"]).is_empty());
    }

    #[test]
    fn test_sourced_vars_reads_exported_and_plain_assignments() {
        let host = LiveHost::new();
        if !host.has_command("bash") {
            return;
        }
        let dir = tempdir().unwrap();
        let script = dir.path().join("env.sh");
        fs::write(&script, "export A_VER=1.2\nB_TGT=\"x86 64\"\necho noise\n").unwrap();
        let vars = host.sourced_vars(&script, &["A_VER", "B_TGT", "C_NONE"]);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("A_VER").map(String::as_str), Some("1.2"));
        assert_eq!(vars.get("B_TGT").map(String::as_str), Some("x86 64"));
        assert!(!vars.contains_key("C_NONE"));
    }
}

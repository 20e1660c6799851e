//! Compiler toolchain installation and its environment script.

use super::Probe;
use crate::config::ToolchainCfg;
use crate::host::Host;
use crate::ledger::Ledger;
use std::path::{Path, PathBuf};

pub struct ToolchainProbe {
    cfg: ToolchainCfg,
}

impl ToolchainProbe {
    pub fn new(cfg: ToolchainCfg) -> Self {
        Self { cfg }
    }

    fn locate_env_script(&self, host: &dyn Host, root: &Path) -> Option<PathBuf> {
        self.cfg
            .env_scripts
            .iter()
            .map(|s| root.join(s))
            .find(|p| host.path_exists(p))
    }
}

impl Probe for ToolchainProbe {
    fn title(&self) -> &'static str {
        "Toolchain"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let root = Path::new(&self.cfg.install_dir);
        if !host.path_exists(root) {
            ledger.warn(format!("Toolchain not installed at {}", root.display()));
            return;
        }
        ledger.ok(format!("Toolchain installed at {}", root.display()));

        let Some(script) = self.locate_env_script(host, root) else {
            ledger.warn(format!(
                "Environment script not found under {} (tried {})",
                root.display(),
                self.cfg.env_scripts.join(", ")
            ));
            return;
        };

        let (version_var, target_var) = (&self.cfg.version_var, &self.cfg.target_var);
        let vars = host.sourced_vars(&script, &[version_var.as_str(), target_var.as_str()]);
        match (vars.get(version_var), vars.get(target_var)) {
            (Some(version), Some(target)) => {
                let dir = root.join(version).join(target);
                if host.path_exists(&dir) {
                    ledger.ok(format!("Toolchain {} for {} at {}", version, target, dir.display()));
                } else {
                    ledger.warn(format!(
                        "Toolchain {} for {} missing: {} does not exist",
                        version,
                        target,
                        dir.display()
                    ));
                }
            }
            _ => ledger.warn(format!(
                "{} did not define both {} and {}",
                script.display(),
                version_var,
                target_var
            )),
        }
    }
}

//! Kernel driver: module, device directory, and device node permissions.

use super::Probe;
use crate::config::DriverCfg;
use crate::host::Host;
use crate::inventory;
use crate::ledger::Ledger;
use crate::models::Finding;
use std::path::Path;

pub struct DriverProbe {
    cfg: DriverCfg,
}

impl DriverProbe {
    pub fn new(cfg: DriverCfg) -> Self {
        Self { cfg }
    }

    fn check_module(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let module = &self.cfg.module;
        if inventory::loaded_modules(host).iter().any(|m| m == module) {
            ledger.ok(format!("Kernel module '{}' loaded", module));
        } else {
            ledger.fail(format!("Kernel module '{}' not loaded", module));
        }
    }

    fn check_device_dir(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let dir = &self.cfg.device_dir;
        match host.list_dir(Path::new(dir)) {
            None => ledger.fail(format!("Device directory {} missing", dir)),
            Some(entries) if entries.is_empty() => {
                ledger.fail(format!("Device directory {} empty", dir))
            }
            Some(entries) => ledger.ok(format!(
                "Device directory {} populated ({} entries)",
                dir,
                entries.len()
            )),
        }
    }

    // No nodes means no finding: the directory check already reported it.
    fn check_permissions(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let nodes = host.glob(&self.cfg.device_glob);
        if nodes.is_empty() {
            return;
        }
        let unreadable: Vec<String> = nodes
            .iter()
            .filter(|p| !host.is_readable(p))
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        if unreadable.is_empty() {
            ledger.ok(format!(
                "All {} device node(s) readable by current user",
                nodes.len()
            ));
        } else {
            ledger.record(
                Finding::warn(format!(
                    "{} of {} device node(s) not readable by current user",
                    unreadable.len(),
                    nodes.len()
                ))
                .with_details(unreadable),
            );
        }
    }
}

impl Probe for DriverProbe {
    fn title(&self) -> &'static str {
        "Driver"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        self.check_module(host, ledger);
        self.check_device_dir(host, ledger);
        self.check_permissions(host, ledger);
    }
}

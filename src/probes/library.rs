//! Resource library package and its daemon's service state.

use super::Probe;
use crate::config::LibraryCfg;
use crate::host::Host;
use crate::inventory::{self, PackageState};
use crate::ledger::Ledger;

pub struct LibraryProbe {
    cfg: LibraryCfg,
}

impl LibraryProbe {
    pub fn new(cfg: LibraryCfg) -> Self {
        Self { cfg }
    }
}

impl Probe for LibraryProbe {
    fn title(&self) -> &'static str {
        "Resource Library"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let pkg = &self.cfg.package;
        match inventory::package_state(host, pkg) {
            PackageState::Missing => ledger.fail(format!("Package '{}' not installed", pkg)),
            PackageState::Installed { version } => ledger.ok(format!(
                "Package '{}' installed (version {})",
                pkg,
                version.as_deref().unwrap_or("unknown")
            )),
        }

        let svc = &self.cfg.service;
        if !host.has_command("systemctl") {
            ledger.info(format!(
                "systemctl not available; skipping service checks for '{}'",
                svc
            ));
            return;
        }

        match inventory::service_state(host, "is-active", svc) {
            Some(s) if s == "active" => ledger.ok(format!("Service '{}' is active", svc)),
            other => ledger.fail(format!(
                "Service '{}' is not active (state: {})",
                svc,
                other.as_deref().unwrap_or("unknown")
            )),
        }

        match inventory::service_state(host, "is-enabled", svc) {
            Some(s) if s == "enabled" => ledger.ok(format!("Service '{}' is enabled", svc)),
            other => ledger.warn(format!(
                "Service '{}' is not enabled (state: {})",
                svc,
                other.as_deref().unwrap_or("unknown")
            )),
        }
    }
}

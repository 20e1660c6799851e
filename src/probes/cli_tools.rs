use super::Probe;
use crate::config::CliCfg;
use crate::host::Host;
use crate::inventory::{self, DeviceInfo};
use crate::ledger::Ledger;
use crate::models::Finding;

/// Accelerator CLI presence, device enumeration, and the companion tool.
pub struct CliToolsProbe {
    cfg: CliCfg,
}

impl CliToolsProbe {
    pub fn new(cfg: CliCfg) -> Self {
        Self { cfg }
    }

    fn check_devices(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let cli = &self.cfg.primary;
        let count = match inventory::device_count(host, cli, &self.cfg.count_args) {
            Some(n) if n > 0 => n,
            _ => {
                ledger.info(format!("No devices detected by '{}'", cli));
                return;
            }
        };

        let mut details = Vec::new();
        let mut silent = Vec::new();
        for idx in 0..count {
            match inventory::device_info(host, cli, &self.cfg.info_args, idx) {
                Some(info) if !info.is_empty() => details.push(device_line(idx, &info)),
                Some(_) => {}
                None => silent.push(idx),
            }
        }
        ledger.record(
            Finding::ok(format!("{} device(s) reported by '{}'", count, cli)).with_details(details),
        );
        for idx in silent {
            ledger.warn(format!("Device {}: '{}' returned no info", idx, cli));
        }
    }
}

fn device_line(idx: u32, info: &DeviceInfo) -> String {
    let mut line = format!("Device {}:", idx);
    for (label, value) in [
        ("target", &info.target),
        ("bdf", &info.bdf),
        ("computable", &info.computable),
    ] {
        if let Some(v) = value {
            line.push_str(&format!(" {}={}", label, v));
        }
    }
    line
}

impl Probe for CliToolsProbe {
    fn title(&self) -> &'static str {
        "CLI & Tools"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        if host.has_command(&self.cfg.primary) {
            ledger.ok(format!("'{}' found", self.cfg.primary));
            self.check_devices(host, ledger);
        } else {
            ledger.fail(format!("'{}' not found", self.cfg.primary));
        }

        if host.has_command(&self.cfg.companion) {
            ledger.ok(format!("'{}' found", self.cfg.companion));
        } else {
            ledger.warn(format!("'{}' not found", self.cfg.companion));
        }
    }
}

use super::Probe;
use crate::config::PciCfg;
use crate::host::Host;
use crate::inventory;
use crate::ledger::Ledger;
use crate::models::Finding;

/// Accelerator cards visible on the PCI bus.
pub struct PciProbe {
    cfg: PciCfg,
}

impl PciProbe {
    pub fn new(cfg: PciCfg) -> Self {
        Self { cfg }
    }
}

impl Probe for PciProbe {
    fn title(&self) -> &'static str {
        "PCI / Hardware"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let devices = inventory::pci_devices(host, &self.cfg.vendor_id);
        if devices.is_empty() {
            ledger.fail(format!(
                "Accelerator device not detected (vendor {})",
                self.cfg.vendor_id
            ));
            return;
        }
        let n = devices.len();
        ledger.record(
            Finding::ok(format!("{} accelerator device(s) detected", n)).with_details(devices),
        );
    }
}

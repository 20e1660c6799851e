//! OS, kernel and container facts. Informational only.

use super::Probe;
use crate::config::EnvironmentCfg;
use crate::host::Host;
use crate::inventory::{self, ContainerSignal};
use crate::ledger::Ledger;

pub struct SystemProbe {
    cfg: EnvironmentCfg,
}

impl SystemProbe {
    pub fn new(cfg: EnvironmentCfg) -> Self {
        Self { cfg }
    }
}

impl Probe for SystemProbe {
    fn title(&self) -> &'static str {
        "System Environment"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let os = inventory::os_name(host).unwrap_or_else(|| "unknown".to_string());
        ledger.info(format!("OS: {}", os));

        let kernel = inventory::kernel_release(host).unwrap_or_else(|| "unknown".to_string());
        ledger.info(format!("Kernel: {}", kernel));

        let container = inventory::container_signal(
            host,
            &self.cfg.container_env,
            &self.cfg.container_sentinel,
        );
        match container {
            Some(ContainerSignal::EnvFlag(name)) => {
                ledger.info(format!("Container: yes ({}=1)", name))
            }
            Some(ContainerSignal::Sentinel(path)) => {
                ledger.info(format!("Container: yes ({} present)", path))
            }
            None => ledger.info("Container: no"),
        }
    }
}

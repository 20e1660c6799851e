//! CXL memory expansion and DAX devices.
//!
//! Sub-checks, each recorded on its own:
//! - companion tools on PATH (WARN when missing)
//! - ACPI CEDT table (INFO when absent, never a failure)
//! - `cxl_*` kernel modules
//! - CXL regions from `cxl list -R`
//! - DAX character devices, enriched from `stat` and `daxctl list`

use super::Probe;
use crate::config::CxlCfg;
use crate::host::Host;
use crate::inventory::{self, DaxRecord, Region};
use crate::ledger::Ledger;
use crate::models::Finding;
use crate::size::human_size;
use std::collections::HashMap;
use std::path::Path;

pub struct CxlProbe {
    cfg: CxlCfg,
}

impl CxlProbe {
    pub fn new(cfg: CxlCfg) -> Self {
        Self { cfg }
    }

    fn check_tools(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        for tool in &self.cfg.tools {
            if host.has_command(tool) {
                ledger.ok(format!("'{}' found", tool));
            } else {
                ledger.warn(format!("'{}' not found", tool));
            }
        }
    }

    fn check_acpi_table(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let table = &self.cfg.acpi_table;
        if host.path_exists(Path::new(table)) {
            ledger.ok(format!("ACPI table {} present", table));
        } else {
            ledger.info(format!("ACPI table {} not present", table));
        }
    }

    fn check_modules(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let prefix = &self.cfg.module_prefix;
        let matched: Vec<String> = inventory::loaded_modules(host)
            .into_iter()
            .filter(|m| m.starts_with(prefix.as_str()))
            .collect();
        if matched.is_empty() {
            ledger.warn(format!("No kernel modules matching '{}*' loaded", prefix));
        } else {
            ledger.ok(format!("CXL kernel modules loaded: {}", matched.join(", ")));
        }
    }

    fn check_regions(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let listing = inventory::cxl_regions(host);
        if !listing.present {
            ledger.fail("No CXL regions found");
            return;
        }
        let finding = match listing.regions {
            Some(regions) => Finding::ok(format!("{} CXL region(s) present", regions.len()))
                .with_details(regions.iter().map(region_line)),
            None => Finding::ok("CXL region(s) present"),
        };
        ledger.record(finding);
    }

    fn check_dax_devices(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        let nodes = host.glob(&self.cfg.dax_glob);
        if nodes.is_empty() {
            ledger.fail(format!("No DAX devices found ({})", self.cfg.dax_glob));
            return;
        }
        let records = inventory::dax_records(host);
        let details: Vec<String> = nodes
            .iter()
            .map(|p| dax_line(p, inventory::permission_string(host, p), &records))
            .collect();
        ledger.record(
            Finding::ok(format!("{} DAX device(s) present", nodes.len())).with_details(details),
        );
    }
}

fn or_unknown(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("unknown")
}

fn region_line(r: &Region) -> String {
    format!(
        "{} size={} type={} decode_state={}",
        or_unknown(&r.name),
        human_size(r.size),
        or_unknown(&r.kind),
        or_unknown(&r.decode_state)
    )
}

/// `<path> [perm] [size=..] [mode=..]`; each optional part only when known.
fn dax_line(path: &Path, perm: Option<String>, records: &HashMap<String, DaxRecord>) -> String {
    let mut line = path.to_string_lossy().to_string();
    if let Some(perm) = perm {
        line.push(' ');
        line.push_str(&perm);
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if let Some(rec) = records.get(&name) {
        if rec.size.is_some() {
            line.push_str(&format!(" size={}", human_size(rec.size)));
        }
        if let Some(mode) = &rec.mode {
            line.push_str(&format!(" mode={}", mode));
        }
    }
    line
}

impl Probe for CxlProbe {
    fn title(&self) -> &'static str {
        "CXL / DAX"
    }

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) {
        self.check_tools(host, ledger);
        self.check_acpi_table(host, ledger);
        self.check_modules(host, ledger);
        self.check_regions(host, ledger);
        self.check_dax_devices(host, ledger);
    }
}

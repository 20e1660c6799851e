//! Probe registry and the run itself.
//!
//! Probes execute one at a time in a fixed order; each gets its own
//! section heading. The exit code comes from the ledger alone.

use crate::config::Effective;
use crate::host::Host;
use crate::ledger::Ledger;
use crate::probes::{
    CliToolsProbe, CxlProbe, DriverProbe, LibraryProbe, PciProbe, Probe, SystemProbe,
    ToolchainProbe,
};
use tracing::debug;

pub struct Runner {
    probes: Vec<Box<dyn Probe>>,
}

impl Runner {
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// The seven stock probes, in reporting order.
    pub fn standard(eff: &Effective) -> Self {
        Self::new(vec![
            Box::new(SystemProbe::new(eff.environment.clone())),
            Box::new(PciProbe::new(eff.pci.clone())),
            Box::new(DriverProbe::new(eff.driver.clone())),
            Box::new(CxlProbe::new(eff.cxl.clone())),
            Box::new(LibraryProbe::new(eff.library.clone())),
            Box::new(CliToolsProbe::new(eff.cli.clone())),
            Box::new(ToolchainProbe::new(eff.toolchain.clone())),
        ])
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.title()).collect()
    }

    /// Run every probe once, write the trailer, and return the exit code.
    pub fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>) -> i32 {
        for probe in &self.probes {
            debug!("probe start: {}", probe.title());
            ledger.section(probe.title());
            probe.run(host, ledger);
        }
        ledger.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::models::Summary;
    use crate::output::OutputMode;

    fn healthy_host() -> FakeHost {
        FakeHost::new()
            .file("/etc/os-release", "PRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n")
            .output("uname -r", "5.15.0-105-generic\n")
            .output("lspci -d 1eff:", "3b:00.0 Processing accelerators: Device 1eff:1220\n")
            .file(
                "/proc/modules",
                "rebellions 262144 0 - Live 0x0\ncxl_acpi 20480 0 - Live 0x0\ncxl_core 1 0 - Live 0x0\n",
            )
            .dir("/dev/rebellions", &["rbln0"])
            .node("/dev/rbln0", true)
            .file("/sys/firmware/acpi/tables/CEDT", "")
            .output(
                "cxl list -R",
                r#"[{"region":"region0","size":68719476736,"type":"ram","decode_state":"commit"}]"#,
            )
            .output("daxctl list", r#"[{"chardev":"dax0.0","size":68719476736,"mode":"devdax"}]"#)
            .node("/dev/dax0.0", true)
            .output("stat -c %A /dev/dax0.0", "crw-rw----\n")
            .output("dpkg -s rbln-daemon", "Status: install ok installed\nVersion: 1.4.2\n")
            .output("systemctl is-active rbln-daemon", "active\n")
            .output("systemctl is-enabled rbln-daemon", "enabled\n")
            .output("rbln-cli device count", "Device count: 1\n")
            .output(
                "rbln-cli device info --index 0",
                "Target: ATOM\nBDF: 0000:3b:00.0\nComputable: true\n",
            )
            .tool("rbln-stat")
            .dir("/opt/rebellions/toolchain", &["env.sh", "1.4.2"])
            .file("/opt/rebellions/toolchain/env.sh", "")
            .sourced("RBLN_TOOLCHAIN_VERSION", "1.4.2")
            .sourced("RBLN_TOOLCHAIN_TARGET", "x86_64")
            .dir("/opt/rebellions/toolchain/1.4.2/x86_64", &["bin"])
    }

    fn run_all(host: &FakeHost, mode: OutputMode) -> (i32, Summary, String) {
        let runner = Runner::standard(&Effective::default());
        let mut buf = Vec::new();
        let (code, summary) = {
            let mut ledger = Ledger::new(&mut buf, mode, false);
            let code = runner.run(host, &mut ledger);
            (code, ledger.summary())
        };
        (code, summary, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_fixed_probe_order() {
        let runner = Runner::standard(&Effective::default());
        assert_eq!(
            runner.titles(),
            vec![
                "System Environment",
                "PCI / Hardware",
                "Driver",
                "CXL / DAX",
                "Resource Library",
                "CLI & Tools",
                "Toolchain"
            ]
        );
    }

    #[test]
    fn test_healthy_host_passes() {
        let (code, summary, text) = run_all(&healthy_host(), OutputMode::Human);
        assert_eq!(summary.fail, 0, "{}", text);
        assert_eq!(summary.warn, 0, "{}", text);
        assert_eq!(code, 0);
        assert!(text.contains("=== Toolchain ===\n[ OK ] Toolchain installed"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_absent_host_fails_without_ok_tool_checks() {
        let (code, summary, text) = run_all(&FakeHost::new(), OutputMode::Human);
        assert_eq!(code, 1);
        assert_eq!(summary.ok, 0, "{}", text);
        // PCI, module, device dir, regions, DAX, package, primary CLI
        assert_eq!(summary.fail, 7);
        assert!(text.contains("[INFO] OS: unknown"));
        assert!(text.contains("[INFO] Kernel: unknown"));
        assert!(text.contains("[WARN] 'cxl' not found"));
        assert!(text.contains("[WARN] 'rbln-stat' not found"));
    }

    #[test]
    fn test_counters_match_findings_emitted() {
        let (_, summary, text) = run_all(&FakeHost::new(), OutputMode::Human);
        let labeled = text
            .lines()
            .filter(|l| {
                ["[ OK ]", "[WARN]", "[FAIL]", "[INFO]"]
                    .iter()
                    .any(|p| l.starts_with(p))
            })
            .count();
        assert_eq!(summary.total(), labeled);
    }

    #[test]
    fn test_json_report_has_every_section() {
        let (code, _, text) = run_all(&healthy_host(), OutputMode::Json);
        assert_eq!(code, 0);
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["sections"].as_array().unwrap().len(), 7);
        assert_eq!(v["sections"][1]["findings"][0]["severity"], "ok");
        assert_eq!(v["exit_code"], 0);
    }

    #[test]
    fn test_single_failure_flips_exit_code() {
        let host = healthy_host().failing("systemctl is-active rbln-daemon", "failed\n");
        let (code, summary, _) = run_all(&host, OutputMode::Human);
        assert_eq!(summary.fail, 1);
        assert_eq!(code, 1);
    }
}

//! Typed adapters over the external collaborators.
//!
//! Each function asks the `Host` for one tool's output or one file and
//! turns it into plain records. Severity is never decided here; an
//! unavailable tool or unparseable output becomes `None` or an empty
//! collection and the probe classifies it.

use crate::host::Host;
use crate::parse;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::path::Path;

const OS_RELEASE: &str = "/etc/os-release";
const KERNEL_RELEASE: &str = "/proc/sys/kernel/osrelease";
const PROC_MODULES: &str = "/proc/modules";

/// Pretty OS name from `/etc/os-release`.
pub fn os_name(host: &dyn Host) -> Option<String> {
    parse::os_release_name(&host.read_file(Path::new(OS_RELEASE))?)
}

/// Kernel release from `uname -r`, falling back to procfs.
pub fn kernel_release(host: &dyn Host) -> Option<String> {
    host.run("uname", &["-r"])
        .filter(|o| o.success)
        .map(|o| o.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            host.read_file(Path::new(KERNEL_RELEASE))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// How the process learned it runs in a container, if it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerSignal {
    EnvFlag(String),
    Sentinel(String),
}

pub fn container_signal(
    host: &dyn Host,
    env_name: &str,
    sentinel: &str,
) -> Option<ContainerSignal> {
    if host.env_var(env_name).map(|v| v.trim() == "1").unwrap_or(false) {
        return Some(ContainerSignal::EnvFlag(env_name.to_string()));
    }
    if host.path_exists(Path::new(sentinel)) {
        return Some(ContainerSignal::Sentinel(sentinel.to_string()));
    }
    None
}

/// `lspci -d <vendor>:` rows, one per device. Empty when lspci is missing.
pub fn pci_devices(host: &dyn Host, vendor_id: &str) -> Vec<String> {
    let filter = format!("{}:", vendor_id);
    host.run("lspci", &["-d", &filter])
        .filter(|o| o.success)
        .map(|o| parse::non_empty_lines(&o.stdout))
        .unwrap_or_default()
}

/// Names of loaded kernel modules.
pub fn loaded_modules(host: &dyn Host) -> Vec<String> {
    host.read_file(Path::new(PROC_MODULES))
        .map(|s| parse::first_tokens(&s))
        .unwrap_or_default()
}

/// Symbolic permission string (`crw-rw----`) from `stat`.
pub fn permission_string(host: &dyn Host, path: &Path) -> Option<String> {
    let p = path.to_string_lossy().to_string();
    host.run("stat", &["-c", "%A", &p])
        .filter(|o| o.success)
        .map(|o| o.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    pub name: Option<String>,
    pub size: Option<i64>,
    pub kind: Option<String>,
    pub decode_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Result of `cxl list -R`.
///
/// Empty output, or JSON holding no record with a `region` name, means no
/// regions. `regions` is `None` when the text is not JSON at all.
pub struct RegionListing {
    pub present: bool,
    pub regions: Option<Vec<Region>>,
}

pub fn cxl_regions(host: &dyn Host) -> RegionListing {
    let raw = host
        .run("cxl", &["list", "-R"])
        .map(|o| o.stdout.trim().to_string())
        .unwrap_or_default();
    if raw.is_empty() {
        return RegionListing::default();
    }
    match parse_regions(&raw) {
        Some(regions) if regions.is_empty() => RegionListing::default(),
        regions => RegionListing {
            present: true,
            regions,
        },
    }
}

fn json_records(raw: &str) -> Option<Vec<Json>> {
    match serde_json::from_str::<Json>(raw).ok()? {
        Json::Array(items) => Some(items),
        obj @ Json::Object(_) => Some(vec![obj]),
        _ => None,
    }
}

fn str_field(rec: &Json, key: &str) -> Option<String> {
    rec.get(key)?.as_str().map(str::to_string)
}

fn int_field(rec: &Json, key: &str) -> Option<i64> {
    let v = rec.get(key)?;
    v.as_i64().or_else(|| v.as_str()?.trim().parse().ok())
}

fn parse_regions(raw: &str) -> Option<Vec<Region>> {
    let records = json_records(raw)?;
    Some(
        records
            .iter()
            .filter_map(|r| {
                let name = str_field(r, "region")?;
                Some(Region {
                    name: Some(name),
                    size: int_field(r, "size"),
                    kind: str_field(r, "type"),
                    decode_state: str_field(r, "decode_state"),
                })
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaxRecord {
    pub size: Option<i64>,
    pub mode: Option<String>,
}

/// `daxctl list` records keyed by character device name (`dax0.0`).
/// Empty when daxctl is missing or prints something other than JSON.
pub fn dax_records(host: &dyn Host) -> HashMap<String, DaxRecord> {
    let Some(out) = host.run("daxctl", &["list"]) else {
        return HashMap::new();
    };
    let Some(records) = json_records(out.stdout.trim()) else {
        return HashMap::new();
    };
    records
        .iter()
        .filter_map(|r| {
            let name = str_field(r, "chardev")?;
            Some((
                name,
                DaxRecord {
                    size: int_field(r, "size"),
                    mode: str_field(r, "mode"),
                },
            ))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageState {
    Missing,
    Installed { version: Option<String> },
}

/// Query dpkg, then rpm, for an installed package.
pub fn package_state(host: &dyn Host, package: &str) -> PackageState {
    if let Some(out) = host.run("dpkg", &["-s", package]).filter(|o| o.success) {
        let installed = parse::labeled_value(&out.stdout, "Status")
            .map(|s| s.ends_with("installed") && !s.contains("not-installed"))
            .unwrap_or(true);
        if installed {
            return PackageState::Installed {
                version: parse::labeled_value(&out.stdout, "Version"),
            };
        }
    }
    if let Some(out) = host
        .run("rpm", &["-q", "--queryformat", "%{VERSION}", package])
        .filter(|o| o.success)
    {
        let v = out.stdout.trim();
        return PackageState::Installed {
            version: (!v.is_empty()).then(|| v.to_string()),
        };
    }
    PackageState::Missing
}

/// First line printed by `systemctl <verb> <service>`, whatever the exit
/// status (`is-active` exits nonzero for `inactive`).
pub fn service_state(host: &dyn Host, verb: &str, service: &str) -> Option<String> {
    let out = host.run("systemctl", &[verb, service])?;
    out.stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Device count reported by the accelerator CLI.
pub fn device_count(host: &dyn Host, cli: &str, args: &[String]) -> Option<u32> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = host.run(cli, &args)?;
    parse::device_count(&out.stdout)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub target: Option<String>,
    pub bdf: Option<String>,
    pub computable: Option<String>,
}

impl DeviceInfo {
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.bdf.is_none() && self.computable.is_none()
    }
}

/// Per-device info; `None` when the query printed nothing.
pub fn device_info(host: &dyn Host, cli: &str, args: &[String], index: u32) -> Option<DeviceInfo> {
    let idx = index.to_string();
    let args: Vec<String> = args.iter().map(|a| a.replace("{index}", &idx)).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = host.run(cli, &args)?;
    if out.stdout.trim().is_empty() {
        return None;
    }
    Some(DeviceInfo {
        target: parse::labeled_value(&out.stdout, "Target"),
        bdf: parse::labeled_value(&out.stdout, "BDF"),
        computable: parse::labeled_value(&out.stdout, "Computable"),
    })
}

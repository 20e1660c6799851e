//! Configuration discovery and effective settings resolution.
//!
//! accelcheck reads `accelcheck.toml|yaml|yml` from the current directory,
//! then from `/etc/accelcheck/`, unless `--config` names a file. Every key
//! is optional; built-in defaults describe the stock host layout:
//! - `output`: `human`
//! - `[pci] vendor_id`: `1eff`
//! - `[driver]`: module `rebellions`, nodes under `/dev/rebellions` and `/dev/rbln*`
//! - `[cxl]`: tools `cxl`/`daxctl`, CEDT table, `cxl_*` modules, `/dev/dax*`
//! - `[library]`: package and service `rbln-daemon`
//! - `[cli]`: `rbln-cli` (count/info subcommands) and companion `rbln-stat`
//! - `[toolchain]`: `/opt/rebellions/toolchain` with an `env.sh`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::output::OutputMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_NAMES: [&str; 3] = ["accelcheck.toml", "accelcheck.yaml", "accelcheck.yml"];
const SYSTEM_CONFIG_DIR: &str = "/etc/accelcheck";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
/// Container detection signals under `[environment]`.
pub struct EnvironmentCfg {
    pub container_env: String,
    pub container_sentinel: String,
}

impl Default for EnvironmentCfg {
    fn default() -> Self {
        Self {
            container_env: "ACCELCHECK_CONTAINER".into(),
            container_sentinel: "/.dockerenv".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PciCfg {
    pub vendor_id: String,
}

impl Default for PciCfg {
    fn default() -> Self {
        Self {
            vendor_id: "1eff".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriverCfg {
    pub module: String,
    pub device_dir: String,
    pub device_glob: String,
}

impl Default for DriverCfg {
    fn default() -> Self {
        Self {
            module: "rebellions".into(),
            device_dir: "/dev/rebellions".into(),
            device_glob: "/dev/rbln*".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CxlCfg {
    pub tools: Vec<String>,
    pub acpi_table: String,
    pub module_prefix: String,
    pub dax_glob: String,
}

impl Default for CxlCfg {
    fn default() -> Self {
        Self {
            tools: vec!["cxl".into(), "daxctl".into()],
            acpi_table: "/sys/firmware/acpi/tables/CEDT".into(),
            module_prefix: "cxl_".into(),
            dax_glob: "/dev/dax*".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LibraryCfg {
    pub package: String,
    pub service: String,
}

impl Default for LibraryCfg {
    fn default() -> Self {
        Self {
            package: "rbln-daemon".into(),
            service: "rbln-daemon".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
/// Accelerator CLIs. `info_args` may contain `{index}`.
pub struct CliCfg {
    pub primary: String,
    pub count_args: Vec<String>,
    pub info_args: Vec<String>,
    pub companion: String,
}

impl Default for CliCfg {
    fn default() -> Self {
        Self {
            primary: "rbln-cli".into(),
            count_args: vec!["device".into(), "count".into()],
            info_args: vec![
                "device".into(),
                "info".into(),
                "--index".into(),
                "{index}".into(),
            ],
            companion: "rbln-stat".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
/// Compiler toolchain layout. `env_scripts` are tried in order, relative
/// to `install_dir`.
pub struct ToolchainCfg {
    pub install_dir: String,
    pub env_scripts: Vec<String>,
    pub version_var: String,
    pub target_var: String,
}

impl Default for ToolchainCfg {
    fn default() -> Self {
        Self {
            install_dir: "/opt/rebellions/toolchain".into(),
            env_scripts: vec!["env.sh".into(), "bin/env.sh".into()],
            version_var: "RBLN_TOOLCHAIN_VERSION".into(),
            target_var: "RBLN_TOOLCHAIN_TARGET".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `accelcheck.toml|yaml`.
pub struct AccelConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub environment: EnvironmentCfg,
    #[serde(default)]
    pub pci: PciCfg,
    #[serde(default)]
    pub driver: DriverCfg,
    #[serde(default)]
    pub cxl: CxlCfg,
    #[serde(default)]
    pub library: LibraryCfg,
    #[serde(default)]
    pub cli: CliCfg,
    #[serde(default)]
    pub toolchain: ToolchainCfg,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the runner after applying precedence.
pub struct Effective {
    pub config_path: Option<PathBuf>,
    pub output: OutputMode,
    pub environment: EnvironmentCfg,
    pub pci: PciCfg,
    pub driver: DriverCfg,
    pub cxl: CxlCfg,
    pub library: LibraryCfg,
    pub cli: CliCfg,
    pub toolchain: ToolchainCfg,
}

impl Default for Effective {
    fn default() -> Self {
        from_parts(None, None, AccelConfig::default())
    }
}

/// Directories searched for a config file, in order.
pub fn default_search_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("."), PathBuf::from(SYSTEM_CONFIG_DIR)]
}

/// First `accelcheck.{toml,yaml,yml}` found in `dirs`.
pub fn discover_config(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|d| CONFIG_NAMES.iter().map(move |n| d.join(n)))
        .find(|p| p.is_file())
}

/// Load `AccelConfig` from a TOML or YAML file, chosen by extension.
pub fn load_config(path: &Path) -> Result<AccelConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<AccelConfig>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<AccelConfig>(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_config: Option<&str>,
    cli_output: Option<&str>,
) -> Result<Effective, ConfigError> {
    resolve_effective_in(&default_search_dirs(), cli_config, cli_output)
}

/// Same as [`resolve_effective`] with explicit search directories.
pub fn resolve_effective_in(
    search_dirs: &[PathBuf],
    cli_config: Option<&str>,
    cli_output: Option<&str>,
) -> Result<Effective, ConfigError> {
    let path = match cli_config {
        Some(p) => Some(PathBuf::from(p)),
        None => discover_config(search_dirs),
    };
    let cfg = match path.as_deref() {
        Some(p) => load_config(p)?,
        None => AccelConfig::default(),
    };
    Ok(from_parts(path, cli_output, cfg))
}

fn from_parts(
    config_path: Option<PathBuf>,
    cli_output: Option<&str>,
    cfg: AccelConfig,
) -> Effective {
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .map(|s| OutputMode::parse(&s))
        .unwrap_or_default();
    Effective {
        config_path,
        output,
        environment: cfg.environment,
        pci: cfg.pci,
        driver: cfg.driver,
        cxl: cfg.cxl,
        library: cfg.library,
        cli: cfg.cli,
        toolchain: cfg.toolchain,
    }
}

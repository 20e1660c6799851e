//! Probes: one self-contained group of checks per subsystem.
//!
//! A probe queries the host through the `inventory` adapters and records
//! findings on the ledger. Probes never return errors; a missing tool or
//! device is itself a finding.

mod cli_tools;
mod cxl;
mod driver;
mod library;
mod pci;
mod system;
mod toolchain;

pub use cli_tools::CliToolsProbe;
pub use cxl::CxlProbe;
pub use driver::DriverProbe;
pub use library::LibraryProbe;
pub use pci::PciProbe;
pub use system::SystemProbe;
pub use toolchain::ToolchainProbe;

use crate::host::Host;
use crate::ledger::Ledger;

pub trait Probe {
    /// Section heading printed before the probe's findings.
    fn title(&self) -> &'static str;

    fn run(&self, host: &dyn Host, ledger: &mut Ledger<'_>);
}

//! CLI argument parsing via `clap`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "accelcheck",
    version,
    about = "Read-only validator for accelerator and CXL host environments",
    long_about = "accelcheck probes the host for the accelerator card, its driver, CXL memory, \
the resource library daemon, vendor CLIs, and the compiler toolchain, then prints one \
severity-tagged line per finding.\n\nExit status: 0 when nothing failed, 1 when any check \
failed, 2 on usage or configuration errors.\n\nConfiguration precedence: CLI > accelcheck.toml > defaults.",
    after_help = "Examples:\n  accelcheck\n  accelcheck --output json\n  accelcheck --config /etc/accelcheck/accelcheck.toml"
)]
/// Top-level CLI options. The tool has a single mode of operation.
pub struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Config file (default: ./accelcheck.toml, then /etc/accelcheck/)"
    )]
    pub config: Option<String>,
    #[arg(
        long,
        value_parser = ["human", "json"],
        help = "Output mode: human|json (default: human)"
    )]
    pub output: Option<String>,
}

//! accelcheck CLI binary entry point.
//! Resolves configuration, runs every probe against the live host, and exits
//! with the ledger's verdict.

use accelcheck::cli::Cli;
use accelcheck::config;
use accelcheck::host::LiveHost;
use accelcheck::ledger::Ledger;
use accelcheck::output;
use accelcheck::runner::Runner;
use accelcheck::utils;
use clap::Parser;
use std::io::IsTerminal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("ACCELCHECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let eff = match config::resolve_effective(cli.config.as_deref(), cli.output.as_deref()) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    };
    match &eff.config_path {
        Some(p) => debug!("using config {}", p.display()),
        None => eprintln!(
            "{} No accelcheck.toml found; using defaults.",
            utils::note_prefix()
        ),
    }

    let stdout = std::io::stdout();
    let color = output::use_colors(
        eff.output,
        stdout.is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    );
    let mut out = stdout.lock();
    let code = {
        let mut ledger = Ledger::new(&mut out, eff.output, color);
        Runner::standard(&eff).run(&LiveHost::new(), &mut ledger)
    };
    std::process::exit(code);
}

//! accelcheck core library.
//!
//! Probes a Linux host for an accelerator card and its software stack,
//! classifies each observation as OK/WARN/FAIL/INFO, and derives a process
//! exit code from the tally. Nothing on the host is ever modified.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `host`: The OS boundary (commands, files, globbing, env); `LiveHost` implements it.
//! - `inventory`: Typed views over host facts (modules, packages, regions, devices).
//! - `parse`: Text extractors for tool output.
//! - `ledger`: Severity ledger that records, prints, and counts findings.
//! - `models`: Severity, finding, and summary types.
//! - `output`: Human/JSON rendering.
//! - `probes`: The seven check groups.
//! - `runner`: Fixed-order probe execution.
//! - `size`: Byte-size formatting.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod host;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod output;
pub mod parse;
pub mod probes;
pub mod runner;
pub mod size;
pub mod utils;

//! Output rendering for the findings transcript.
//!
//! Supports `human` (default) and `json` outputs. Human rendering is pure
//! string composition so the ledger can write each finding as one unit;
//! the JSON form carries per-section findings and a top-level summary.

use crate::models::{Finding, SectionReport, Severity, Summary};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

const DETAIL_INDENT: &str = "         ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Selected rendering mode.
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

impl OutputMode {
    /// Parse a user-supplied mode. Unknown values fall back to human.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => OutputMode::Json,
            _ => OutputMode::Human,
        }
    }
}

/// Decide once per run whether escape codes are emitted.
pub fn use_colors(output: OutputMode, stdout_is_tty: bool, no_color_set: bool) -> bool {
    output == OutputMode::Human && stdout_is_tty && !no_color_set
}

fn paint_label(severity: Severity, color: bool) -> String {
    let label = severity.label();
    if !color {
        return label.to_string();
    }
    match severity {
        Severity::Ok => label.green().bold().to_string(),
        Severity::Warn => label.yellow().bold().to_string(),
        Severity::Fail => label.red().bold().to_string(),
        Severity::Info => label.blue().bold().to_string(),
    }
}

/// Render one finding: the labeled main line, then each detail indented
/// on its own line. Always ends with a newline.
pub fn render_finding(finding: &Finding, color: bool) -> String {
    let mut out = format!("{} {}\n", paint_label(finding.severity, color), finding.message);
    for d in &finding.details {
        if color {
            out.push_str(&format!("{}{}\n", DETAIL_INDENT, d.bright_black()));
        } else {
            out.push_str(&format!("{}{}\n", DETAIL_INDENT, d));
        }
    }
    out
}

/// Section heading; a blank line separates it from the previous section.
pub fn render_section(title: &str, color: bool) -> String {
    let heading = format!("=== {} ===", title);
    if color {
        format!("\n{}\n", heading.bold())
    } else {
        format!("\n{}\n", heading)
    }
}

/// Closing summary line followed by the trailing blank line.
pub fn render_summary(summary: &Summary, color: bool) -> String {
    let line = format!(
        "-- Summary -- ok={} warn={} fail={} info={}",
        summary.ok, summary.warn, summary.fail, summary.info
    );
    if color {
        let line = if summary.fail > 0 {
            line.red().bold().to_string()
        } else {
            line.bold().to_string()
        };
        format!("\n{}\n\n", line)
    } else {
        format!("\n{}\n\n", line)
    }
}

/// Compose the JSON report (pure) for printing and tests.
pub fn compose_report_json(
    sections: &[SectionReport],
    summary: &Summary,
    exit_code: i32,
) -> JsonVal {
    json!({
        "sections": sections,
        "summary": summary,
        "exit_code": exit_code,
    })
}

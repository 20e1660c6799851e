//! Severity ledger: counts findings and writes them to the output sink.
//!
//! In human mode each finding is rendered into one buffer and written and
//! flushed immediately, so a finding's main line and its details reach the
//! sink together. In JSON mode findings are held until [`Ledger::finish`].
//! Write errors on the sink are ignored; recording cannot fail.

use crate::models::{Finding, SectionReport, Summary};
use crate::output::{self, OutputMode};
use std::io::Write;
use tracing::debug;

pub struct Ledger<'a> {
    out: &'a mut dyn Write,
    mode: OutputMode,
    color: bool,
    summary: Summary,
    sections: Vec<SectionReport>,
}

impl<'a> Ledger<'a> {
    /// `color` is decided once by the caller and never re-evaluated.
    pub fn new(out: &'a mut dyn Write, mode: OutputMode, color: bool) -> Self {
        Self {
            out,
            mode,
            color: color && mode == OutputMode::Human,
            summary: Summary::default(),
            sections: Vec::new(),
        }
    }

    /// Start a new titled group of findings.
    pub fn section(&mut self, title: &str) {
        match self.mode {
            OutputMode::Human => self.emit(&output::render_section(title, self.color)),
            OutputMode::Json => self.sections.push(SectionReport {
                title: title.to_string(),
                findings: Vec::new(),
            }),
        }
    }

    /// Count and render one finding.
    pub fn record(&mut self, finding: Finding) {
        debug!(severity = %finding.severity, "{}", finding.message);
        self.summary.bump(finding.severity);
        match self.mode {
            OutputMode::Human => {
                let rendered = output::render_finding(&finding, self.color);
                self.emit(&rendered);
            }
            OutputMode::Json => {
                if self.sections.is_empty() {
                    self.section("General");
                }
                if let Some(last) = self.sections.last_mut() {
                    last.findings.push(finding);
                }
            }
        }
    }

    pub fn ok(&mut self, message: impl Into<String>) {
        self.record(Finding::ok(message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Finding::warn(message));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.record(Finding::fail(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Finding::info(message));
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Process exit code implied by the findings so far: 1 when anything
    /// failed, else 0. Warnings and infos never matter.
    pub fn summarize(&self) -> i32 {
        if self.summary.fail > 0 {
            1
        } else {
            0
        }
    }

    /// Write the trailer (summary line, or the whole JSON report) and
    /// return the exit code.
    pub fn finish(&mut self) -> i32 {
        let code = self.summarize();
        match self.mode {
            OutputMode::Human => {
                let trailer = output::render_summary(&self.summary, self.color);
                self.emit(&trailer);
            }
            OutputMode::Json => {
                let report = output::compose_report_json(&self.sections, &self.summary, code);
                let text = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|_| "{}".to_string());
                self.emit(&format!("{}\n", text));
            }
        }
        code
    }

    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

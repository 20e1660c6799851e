//! Shared data models for findings, severities, and the run summary.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Classification of a single checked condition.
///
/// Only `Fail` affects the process exit code.
pub enum Severity {
    Ok,
    Warn,
    Fail,
    Info,
}

impl Severity {
    /// Fixed-width label used in the human transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "[ OK ]",
            Severity::Warn => "[WARN]",
            Severity::Fail => "[FAIL]",
            Severity::Info => "[INFO]",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Ok => "ok",
            Severity::Warn => "warn",
            Severity::Fail => "fail",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One classified observation, optionally followed by auxiliary lines
/// (raw tool rows, per-device records) rendered beneath it.
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Severity::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Severity::Fail, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Attach detail lines, replacing any already present.
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Per-severity counters accumulated over one run.
pub struct Summary {
    pub ok: usize,
    pub warn: usize,
    pub fail: usize,
    pub info: usize,
}

impl Summary {
    pub fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Ok => self.ok += 1,
            Severity::Warn => self.warn += 1,
            Severity::Fail => self.fail += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.warn + self.fail + self.info
    }
}

#[derive(Debug, Clone, Serialize)]
/// Findings grouped under one probe heading (JSON output only).
pub struct SectionReport {
    pub title: String,
    pub findings: Vec<Finding>,
}

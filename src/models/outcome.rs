//! Per-line decode results and run-level classification.

use std::fmt;

use super::Proxy;

/// Result of decoding one non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Success(Proxy),
    /// A known scheme whose payload could not be parsed. The line is skipped.
    Warning { scheme: String, reason: String },
    /// A line that is not a link of any known scheme.
    Error { reason: String },
}

/// Outcome kind recorded by the registry for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Warning,
    Error,
}

/// Reporting entry for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// 1-based line number in the source body
    pub line: usize,
    pub kind: OutcomeKind,
    /// Node name on success, failure reason otherwise
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.success + self.warning + self.error
    }
}

/// Run-level classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Warning,
    Error,
}

impl RunStatus {
    /// Error when nothing decoded, Warning when anything was dropped.
    pub fn classify(tally: &Tally, skipped: usize) -> Self {
        if tally.success == 0 {
            RunStatus::Error
        } else if tally.warning > 0 || tally.error > 0 || skipped > 0 {
            RunStatus::Warning
        } else {
            RunStatus::Success
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "Success",
            RunStatus::Warning => "Warning",
            RunStatus::Error => "Error",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

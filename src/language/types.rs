//! Types describing deadline diagnostics and the checklists they are about

use serde::{Deserialize, Serialize};

/// How loudly a diagnostic should be presented. Ordered from most to least
/// severe so that sorting a list of diagnostics puts errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        }
    }
}

/// A zero-origin line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Range {
        Range {
            start: Position {
                line: start_line,
                column: start_column,
            },
            end: Position {
                line: end_line,
                column: end_column,
            },
        }
    }

    /// Everything we report sits on a single line.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Range {
        Range::new(line, start_column, line, end_column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(range: Range, message: impl Into<String>, severity: Severity) -> Diagnostic {
        Diagnostic {
            range,
            message: message.into(),
            severity,
        }
    }
}

/// Thresholds, in days, partitioning the escalation scale. A deadline
/// closer than `critical` days is a warning; closer than
/// `deadline_approaching` days is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub critical: u32,
    pub deadline_approaching: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            critical: 2,
            deadline_approaching: 4,
        }
    }
}

// now the things found underneath a date

/// One `- [ ] ...` line belonging to a deadline section. The text is what
/// follows the marker; `column` is where the marker starts and `end` is the
/// column at which the line's content stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub end: usize,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn range(&self) -> Range {
        Range::on_line(self.line, self.column, self.end)
    }
}

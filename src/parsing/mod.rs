//! Deadline parsing for markdown checklists

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::language::{Diagnostic, LoadingError, Settings, Severity};

pub mod dates;
pub mod guard;
pub mod ledger;
pub mod parser;
pub mod section;
pub mod tokenizer;

pub use parser::{Parser, ParserVisitor};
pub use section::DeadlineSection;

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that the diagnostics produced by check() below can be
/// presented against the same text.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text once and return its diagnostics. Passing `today` fixes the
/// instant deadlines are measured against; otherwise the clock is used.
pub fn check(content: &str, settings: Settings, today: Option<NaiveDateTime>) -> Vec<Diagnostic> {
    let mut parser = Parser::new(settings);
    if let Some(today) = today {
        parser = parser.with_today(today);
    }

    let diagnostics = parser.parse(content);

    let errors = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .count();
    debug!(
        "Found {} diagnostic{}, {} error{}",
        diagnostics.len(),
        if diagnostics.len() == 1 { "" } else { "s" },
        errors,
        if errors == 1 { "" } else { "s" }
    );

    diagnostics
}

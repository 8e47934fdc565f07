use deadlines::language::{Diagnostic, LoadingError, Severity};
use owo_colors::OwoColorize;
use std::path::Path;

fn severity_label(severity: Severity) -> String {
    let label = severity.label();
    match severity {
        Severity::Error => label
            .bright_red()
            .to_string(),
        Severity::Warning => label
            .bright_yellow()
            .to_string(),
        Severity::Information => label
            .bright_blue()
            .to_string(),
        Severity::Hint => label
            .bright_green()
            .to_string(),
    }
}

/// Format a diagnostic with full details including source code context
pub fn full_diagnostic<'i>(diagnostic: &Diagnostic, filename: &'i Path, source: &'i str) -> String {
    let start = diagnostic
        .range
        .start;
    let end = diagnostic
        .range
        .end;

    let code = source
        .lines()
        .nth(start.line)
        .unwrap_or("?");
    let line = start.line + 1;
    let column = start.column + 1;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    let span = if end.line == start.line {
        end.column
            .saturating_sub(start.column)
            .max(1)
    } else {
        1
    };
    let underline = format!(
        "{}{}",
        " ".repeat(start.column),
        "^".repeat(span)
            .bright_red()
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {} {}
        "#,
        severity_label(diagnostic.severity),
        filename.to_string_lossy(),
        line,
        column,
        diagnostic
            .message
            .bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
        underline,
    )
    .trim_ascii()
    .to_string()
}

/// Format a diagnostic with concise single-line output
pub fn concise_diagnostic<'i>(diagnostic: &Diagnostic, filename: &'i Path) -> String {
    let start = diagnostic
        .range
        .start;

    format!(
        "{}: {}:{}:{} {}",
        severity_label(diagnostic.severity),
        filename.to_string_lossy(),
        start.line + 1,
        start.column + 1,
        diagnostic
            .message
            .bold(),
    )
}

/// Serialize the diagnostics of one document for consumption by other tools
pub fn json_diagnostics(diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(diagnostics)
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}:{}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}

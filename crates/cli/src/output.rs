//! Rendering of diagnostics for the terminal, tooling and CI.

use colored::Colorize;
use graphql_linter::{LintDiagnostic, LintSeverity};
use graphql_syntax::{LineIndex, OffsetRange, ParseError};

/// Rule name reported for syntax errors
pub const SYNTAX_RULE: &str = "syntax";

/// One-based line and column of a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    fn of(line_index: &LineIndex, offset: usize) -> Self {
        let position = line_index.position(offset);
        Self {
            line: position.line + 1,
            column: position.character + 1,
        }
    }
}

/// A suggested fix, positioned for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionOutput {
    pub label: String,
    pub start: Location,
    pub end: Location,
}

/// Diagnostic output structure for collecting warnings and errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticOutput {
    pub file_path: String,
    pub start: Location,
    pub end: Location,
    pub message: String,
    pub severity: LintSeverity,
    pub rule: &'static str,
    pub suggestions: Vec<SuggestionOutput>,
}

impl DiagnosticOutput {
    pub fn from_lint(file_path: &str, line_index: &LineIndex, diagnostic: &LintDiagnostic) -> Self {
        let (start, end) = span(line_index, diagnostic.offset_range);
        let suggestions = diagnostic
            .fixes
            .iter()
            .filter_map(|fix| {
                let first = fix.edits.first()?;
                let (start, end) = span(line_index, first.offset_range);
                Some(SuggestionOutput {
                    label: fix.label.clone(),
                    start,
                    end,
                })
            })
            .collect();

        Self {
            file_path: file_path.to_string(),
            start,
            end,
            message: diagnostic.message.clone(),
            severity: diagnostic.severity,
            rule: diagnostic.rule,
            suggestions,
        }
    }

    pub fn from_parse_error(file_path: &str, line_index: &LineIndex, error: &ParseError) -> Self {
        let start = Location::of(line_index, error.offset);
        Self {
            file_path: file_path.to_string(),
            start,
            end: start,
            message: error.message.clone(),
            severity: LintSeverity::Error,
            rule: SYNTAX_RULE,
            suggestions: Vec::new(),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.severity, LintSeverity::Error)
    }
}

fn span(line_index: &LineIndex, range: OffsetRange) -> (Location, Location) {
    (
        Location::of(line_index, range.start),
        Location::of(line_index, range.end),
    )
}

pub fn print_human(diagnostics: &[DiagnosticOutput]) {
    for diagnostic in diagnostics {
        let label = match diagnostic.severity {
            LintSeverity::Error => "error:".red().bold(),
            LintSeverity::Warning => "warning:".yellow().bold(),
        };
        let message = match diagnostic.severity {
            LintSeverity::Error => diagnostic.message.red(),
            LintSeverity::Warning => diagnostic.message.yellow(),
        };

        println!(
            "\n{}:{}:{}: {label} {message}",
            diagnostic.file_path, diagnostic.start.line, diagnostic.start.column,
        );
        println!("  {}: {}", "rule".dimmed(), diagnostic.rule.dimmed());
        for suggestion in &diagnostic.suggestions {
            println!(
                "  {}: {} at {}:{}",
                "help".cyan(),
                suggestion.label,
                suggestion.start.line,
                suggestion.start.column
            );
        }
    }
}

pub fn json_report(diagnostics: &[DiagnosticOutput], files_checked: usize) -> serde_json::Value {
    let location = |start: Location, end: Location| {
        serde_json::json!({
            "start": { "line": start.line, "column": start.column },
            "end": { "line": end.line, "column": end.column }
        })
    };

    let entries: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "file": d.file_path,
                "message": d.message,
                "severity": d.severity.to_string(),
                "rule": d.rule,
                "location": location(d.start, d.end),
                "suggestions": d.suggestions.iter().map(|s| serde_json::json!({
                    "label": s.label,
                    "location": location(s.start, s.end),
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    serde_json::json!({
        "success": errors == 0,
        "diagnostics": entries,
        "stats": {
            "total_files": files_checked,
            "total_errors": errors,
            "total_warnings": diagnostics.len() - errors,
        }
    })
}

/// GitHub Actions workflow commands for PR annotations
pub fn github_lines(diagnostics: &[DiagnosticOutput]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| {
            let command = match d.severity {
                LintSeverity::Error => "error",
                LintSeverity::Warning => "warning",
            };
            format!(
                "::{command} file={},line={},col={}::{} [{}]",
                d.file_path, d.start.line, d.start.column, d.message, d.rule
            )
        })
        .collect()
}

//! Report formatting and printing utilities.
//!
//! Separate from core logic to allow keyharvest to be used as a library.
//! Every printer has a `_to` variant taking a writer, for tests.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary};
use crate::core::{BackfillEvent, ExtractReport, Progress, SkipReason, TableOutcome};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Display width keys are padded to in translation lines.
const KEY_COLUMN_WIDTH: usize = 24;

pub fn print(result: &CommandResult) {
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract_to(summary, &mut io::stdout().lock());
            print_warnings_to(summary, &mut io::stderr().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print one live progress line.
pub fn print_progress(cwd: &Path, progress: Progress<'_>) {
    print_progress_to(cwd, progress, &mut io::stdout().lock());
}

pub fn print_progress_to<W: Write>(cwd: &Path, progress: Progress<'_>, writer: &mut W) {
    match progress {
        Progress::Translation {
            language, event, ..
        } => match event {
            BackfillEvent::Translated { key, value } => {
                let _ = writeln!(
                    writer,
                    "  {} {} {} {}",
                    language.dimmed(),
                    pad_key(key),
                    "\u{2192}".dimmed(),
                    value
                );
            }
            BackfillEvent::Failed { key, error } => {
                let _ = writeln!(
                    writer,
                    "  {} {} {} {:#}",
                    language.dimmed(),
                    pad_key(key),
                    FAILURE_MARK.red(),
                    error
                );
            }
        },
        Progress::Table { outcome, .. } => print_table_to(cwd, outcome, writer),
    }
}

fn print_table_to<W: Write>(cwd: &Path, outcome: &TableOutcome, writer: &mut W) {
    let path = relative(cwd, &outcome.path);

    if let Some(error) = &outcome.error {
        let _ = writeln!(
            writer,
            "{} {} {}: {}",
            FAILURE_MARK.red(),
            "error:".bold().red(),
            path,
            error
        );
        return;
    }

    let mut details = vec![
        format!("+{}", outcome.added).green().to_string(),
        format!("-{}", outcome.removed).red().to_string(),
    ];
    if outcome.translated > 0 {
        details.push(format!("{} translated", outcome.translated));
    }
    if !outcome.failures.is_empty() {
        details.push(
            format!("{} failed", outcome.failures.len())
                .yellow()
                .to_string(),
        );
    }
    match outcome.skipped {
        Some(SkipReason::BaseLanguage) => details.push("base language".dimmed().to_string()),
        Some(SkipReason::LanguageExcluded) => {
            details.push("excluded from translation".dimmed().to_string())
        }
        Some(SkipReason::TranslationOff) | None => {}
    }

    let _ = writeln!(
        writer,
        "{} Wrote {} ({})",
        SUCCESS_MARK.green(),
        path,
        details.join(", ")
    );
}

/// Print the end-of-run summary.
pub fn print_extract_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let report = &summary.report;

    for module in &report.modules {
        if let Some(copied) = &module.index_copied {
            let _ = writeln!(
                writer,
                "{} Copied {}",
                SUCCESS_MARK.green(),
                relative(&summary.cwd, copied)
            );
        }
    }

    if report.modules.is_empty() {
        let _ = writeln!(
            writer,
            "{} No modules found under {}",
            "warning:".bold().yellow(),
            relative(&summary.cwd, &summary.root_dir)
        );
        return;
    }

    let written = report.tables().filter(|t| t.error.is_none()).count();
    let keys: usize = report.modules.iter().map(|m| m.key_count).sum();
    let added: usize = report.tables().map(|t| t.added).sum();
    let removed: usize = report.tables().map(|t| t.removed).sum();
    let translated: usize = report.tables().map(|t| t.translated).sum();

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} key(s) from {} file(s) in {} module(s), wrote {} table(s)",
            keys,
            report.files_scanned,
            report.modules.len(),
            written
        )
        .green()
    );
    let _ = writeln!(
        writer,
        "  - added: {}, removed: {}, translated: {}",
        added, removed, translated
    );
}

/// Print warnings and errors collected during the run.
pub fn print_warnings_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let report = &summary.report;

    // Verbose runs already printed each unreadable path while scanning.
    if !summary.verbose {
        for warning in &report.warnings {
            let _ = writeln!(
                writer,
                "{} Cannot read {}: {}",
                "warning:".bold().yellow(),
                relative(&summary.cwd, Path::new(&warning.path)),
                warning.error
            );
        }
    }

    let failed = report.failed_translation_count();
    if failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} translation(s) failed, placeholders kept",
            "warning:".bold().yellow(),
            failed
        );
    }

    for module in &report.modules {
        if let Some(error) = &module.index_error {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), error);
        }
    }

    print_error_count_to(report, writer);
}

fn print_error_count_to<W: Write>(report: &ExtractReport, writer: &mut W) {
    let errors = report.error_count();
    if errors > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be updated",
            "error:".bold().red(),
            errors
        );
    }
}

fn print_init(summary: &InitSummary) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", summary.path.display()).green()
    );
}

/// Pad a key to [`KEY_COLUMN_WIDTH`] display columns. Wide (CJK) characters
/// count as two columns.
fn pad_key(key: &str) -> String {
    let width = UnicodeWidthStr::width(key);
    format!("{}{}", key, " ".repeat(KEY_COLUMN_WIDTH.saturating_sub(width)))
}

fn relative(cwd: &Path, path: &Path) -> String {
    path.strip_prefix(cwd).unwrap_or(path).display().to_string()
}

// ============================================================
// Tests
// ============================================================

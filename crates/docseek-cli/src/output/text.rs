//! Text output formatting

use colored::Colorize;
use docseek_core::catalog::category_counts;
use docseek_core::{BuildReport, DiagnosticSeverity, EnhancedResult, PostEntry, Suggestion};
use std::path::Path;

pub struct TextFormatter;

impl TextFormatter {
    /// Ranked results, one block per hit
    pub fn format_search_results(query: &str, results: &[EnhancedResult]) {
        if results.is_empty() {
            println!("No results found for '{query}'");
            return;
        }

        for (rank, result) in results.iter().enumerate() {
            println!("{}", render_result(rank + 1, result));
        }
    }

    pub fn format_suggestions(query: &str, suggestions: &[Suggestion]) {
        if suggestions.is_empty() {
            println!("No suggestions for '{query}'");
            return;
        }

        for suggestion in suggestions {
            println!(
                "{}  {}",
                suggestion.suggestion.bold(),
                format!("{:.2}", suggestion.score).bright_black()
            );
        }
    }

    pub fn format_build_report(report: &BuildReport) {
        println!(
            "{} Indexed {} records ({} markup, {} curated, {} external)",
            "✓".green(),
            report.total_records(),
            report.markup_records,
            report.curated_records,
            report.external_records
        );
        println!("  index:   {}", report.index_path.display());
        println!("  records: {}", report.records_path.display());

        if report.duplicate_ids > 0 {
            println!(
                "  {} {} records replaced an earlier record with the same id",
                "!".yellow(),
                report.duplicate_ids
            );
        }
        if !report.skipped_files.is_empty() {
            println!("  skipped: {}", report.skipped_files.join(", ").bright_black());
        }
        if !report.interactive_files.is_empty() {
            println!(
                "  {} {} interactive pages need curated records:",
                "!".yellow(),
                report.interactive_files.len()
            );
            for file in &report.interactive_files {
                println!("    {file}");
            }
        }
        for diagnostic in &report.diagnostics {
            let label = match diagnostic.severity {
                DiagnosticSeverity::Error => "error".red(),
                DiagnosticSeverity::Warn => "warn".yellow(),
                DiagnosticSeverity::Info => "info".bright_black(),
            };
            let file = diagnostic.file.as_deref().unwrap_or("-");
            println!("  {label} {file}: {}", diagnostic.message);
        }
    }

    pub fn format_catalog_summary(output: &Path, entries: &[PostEntry]) {
        println!(
            "{} Wrote {} posts to {}",
            "✓".green(),
            entries.len(),
            output.display()
        );
        for (category, count) in category_counts(entries) {
            println!("  {category}: {count}");
        }

        if !entries.is_empty() {
            println!("  recent:");
            for entry in entries.iter().take(RECENT_POSTS) {
                println!("    {}  {}", entry.date.bright_black(), entry.title);
            }
        }
    }
}

const RECENT_POSTS: usize = 3;

fn render_result(rank: usize, result: &EnhancedResult) -> String {
    let hit = &result.hit;
    let title = hit
        .stored
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&hit.id);
    let destination = result.destination();

    let mut lines = vec![format!(
        "{rank:>2}. {}  {}",
        title.bold(),
        format!("{:.2}", hit.score).bright_blue()
    )];

    if let Some(section) = hit.stored.section.as_deref() {
        lines.push(format!("    {}", section.bright_black()));
    }

    let marker = if destination.is_external() { " ↗" } else { "" };
    lines.push(format!("    {}{marker}", destination.target().cyan()));

    if !result.matched_headings.is_empty() {
        lines.push(format!("    # {}", result.matched_headings.join(" · ")));
    }
    if !result.matched_tags.is_empty() {
        lines.push(format!("    tags: {}", result.matched_tags.join(", ")));
    }

    lines.join("\n")
}

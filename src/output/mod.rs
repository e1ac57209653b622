//! User-facing output for pdfcompile.
//!
//! Diagnostics go through the `log` facade; this module prints what the
//! user asked for: the run summary, per-item skip notices and the final
//! location of the compiled PDF.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::compiler::{CompileReport, ItemOutcome};
use crate::utils::format_file_size;

/// Display the outcome of a run.
pub fn display_report(formatter: &OutputFormatter, report: &CompileReport) {
    formatter.section("Inputs:");
    for (index, item) in report.items.iter().enumerate() {
        let name = item.path.display();
        formatter.debug(&format!("{name} read as {}", item.kind));
        match &item.outcome {
            ItemOutcome::Included { pages } => {
                formatter.list_item(index + 1, &format!("{name} ({pages} page(s))"));
            }
            ItemOutcome::Skipped { reason } => {
                formatter.warning(&format!("Skipped {name}: {reason}"));
            }
        }
    }

    formatter.section("Summary:");
    formatter.info(&format!(
        "  {} of {} input(s) compiled into {} page(s)",
        report.included_count(),
        report.items.len(),
        report.total_pages
    ));
    formatter.detail("Merged size", &format_file_size(report.merged_size));
    formatter.detail(
        "Compression",
        &match (report.tier.pdf_setting(), report.compressed) {
            (None, _) => "not needed".to_string(),
            (Some(setting), true) => format!("{setting} (adopted)"),
            (Some(setting), false) => format!("{setting} (kept original)"),
        },
    );
    formatter.detail("Final size", &format_file_size(report.final_size));

    if let Some(destination) = &report.destination {
        formatter.success(&format!("Saved {}", destination.display()));
    }
}

/// Serialize the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_json(report: &CompileReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

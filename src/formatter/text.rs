use std::io::Write;

use crate::diagnostic::Severity;
use crate::formatter::{Formatter, RunSummary, plural};

/// Progress lines per pass, then a tally per document.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, summary: &RunSummary, out: &mut dyn Write) {
        let _ = writeln!(out, "Reading {}...", summary.input.display());
        for doc in &summary.documents {
            for phase in &doc.phases {
                let _ = writeln!(out, "Extracting {}...", phase.function);
                if phase.found {
                    let _ = writeln!(out, "  Found {}", plural(phase.entries, "entry", "entries"));
                } else {
                    let _ = writeln!(out, "  Function not found");
                }
            }
            match &doc.written {
                Some(path) => {
                    let _ = writeln!(out, "Wrote {}", path.display());
                }
                None if summary.dry_run => {
                    let _ = writeln!(out, "Skipped {} (dry run)", doc.file);
                }
                None => {}
            }
        }

        let _ = writeln!(out, "\n=== Summary ===");
        for doc in &summary.documents {
            let _ = writeln!(out, "{}: {}", doc.file, plural(doc.records, "sprite", "sprites"));
            for (label, count) in &doc.tallies {
                let _ = writeln!(out, "  {label}: {count}");
            }
        }
        let _ = writeln!(
            out,
            "{}, {} needing review",
            plural(summary.count(Severity::Warning), "warning", "warnings"),
            summary.count(Severity::Review),
        );
    }
}

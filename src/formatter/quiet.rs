use std::io::Write;

use crate::diagnostic::Severity;
use crate::formatter::{Formatter, RunSummary, plural};

/// Silent unless something needs attention.
pub struct QuietFormatter;

impl Formatter for QuietFormatter {
    fn format_to(&self, summary: &RunSummary, out: &mut dyn Write) {
        let warnings = summary.count(Severity::Warning);
        let reviews = summary.count(Severity::Review);
        if warnings == 0 && reviews == 0 {
            return;
        }
        let _ = writeln!(
            out,
            "{}, {} needing review",
            plural(warnings, "warning", "warnings"),
            reviews,
        );
    }
}

pub mod json;
pub mod quiet;
pub mod text;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::diagnostic::{Diagnostic, Severity};
use crate::extract::{Document, Pass};

/// What one run did, in the order it did it.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub dry_run: bool,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub file: &'static str,
    pub records: usize,
    pub phases: Vec<PhaseSummary>,
    pub tallies: Vec<(&'static str, usize)>,
    pub diagnostics: Vec<Diagnostic>,
    /// Where the document was written; `None` on a dry run.
    pub written: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PhaseSummary {
    pub pass: Pass,
    pub function: String,
    pub found: bool,
    pub entries: usize,
}

impl RunSummary {
    pub fn new(input: &Path, dry_run: bool) -> Self {
        Self {
            input: input.to_path_buf(),
            dry_run,
            documents: Vec::new(),
        }
    }

    pub fn push(&mut self, doc: &Document, written: Option<PathBuf>) {
        let mut diagnostics: Vec<Diagnostic> = doc.diagnostics().cloned().collect();
        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.documents.push(DocumentSummary {
            file: doc.kind.file_name(),
            records: doc.records.len(),
            phases: doc
                .phases
                .iter()
                .map(|p| PhaseSummary {
                    pass: p.pass,
                    function: p.function.clone(),
                    found: p.found,
                    entries: p.entries,
                })
                .collect(),
            tallies: doc.tallies(),
            diagnostics,
            written,
        });
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.documents
            .iter()
            .flat_map(|d| &d.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }
}

pub trait Formatter {
    fn format_to(&self, summary: &RunSummary, out: &mut dyn Write);

    fn print(&self, summary: &RunSummary) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(summary, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        "quiet" => Box::new(quiet::QuietFormatter),
        _ => Box::new(text::TextFormatter),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_all_formatters() {
        for name in ["text", "json", "quiet", "anything_else"] {
            let f = create_formatter(name);
            let mut buf = Vec::new();
            f.format_to(&fixtures::sample_summary(), &mut buf);
        }
    }

    #[test]
    fn summary_collects_every_document() {
        let summary = fixtures::sample_summary();
        assert_eq!(summary.documents.len(), 3);
        assert_eq!(summary.documents[0].records, 2);
        assert_eq!(summary.documents[0].phases.len(), 7);
        // One unknown expression plus six missing metadata functions, then one
        // missing function per variant document.
        assert_eq!(summary.count(Severity::Warning), 9);
        assert_eq!(summary.count(Severity::Review), 0);
    }

    #[test]
    fn diagnostics_sorted_by_line() {
        let summary = fixtures::sample_summary();
        let lines: Vec<usize> = summary.documents[0]
            .diagnostics
            .iter()
            .map(|d| d.line.unwrap_or(0))
            .collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[test]
    fn pluralization() {
        assert_eq!(plural(1, "entry", "entries"), "1 entry");
        assert_eq!(plural(0, "warning", "warnings"), "0 warnings");
    }
}

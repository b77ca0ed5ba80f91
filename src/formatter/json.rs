use std::io::Write;

use serde::Serialize;

use crate::diagnostic::Severity;
use crate::formatter::{Formatter, RunSummary};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    input: String,
    dry_run: bool,
    warning_count: usize,
    review_count: usize,
    documents: Vec<JsonDocument>,
}

#[derive(Serialize)]
struct JsonDocument {
    file: String,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<String>,
    phases: Vec<JsonPhase>,
    tallies: Vec<Tally>,
    diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize)]
struct JsonPhase {
    pass: String,
    function: String,
    found: bool,
    entries: usize,
}

#[derive(Serialize)]
struct Tally {
    category: String,
    count: usize,
}

#[derive(Serialize)]
struct JsonDiagnostic {
    function: String,
    line: Option<usize>,
    ids: Vec<u32>,
    severity: String,
    message: String,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, summary: &RunSummary, out: &mut dyn Write) {
        let output = JsonOutput {
            input: summary.input.display().to_string(),
            dry_run: summary.dry_run,
            warning_count: summary.count(Severity::Warning),
            review_count: summary.count(Severity::Review),
            documents: summary
                .documents
                .iter()
                .map(|doc| JsonDocument {
                    file: doc.file.to_string(),
                    records: doc.records,
                    written: doc.written.as_ref().map(|p| p.display().to_string()),
                    phases: doc
                        .phases
                        .iter()
                        .map(|p| JsonPhase {
                            pass: p.pass.key().to_string(),
                            function: p.function.clone(),
                            found: p.found,
                            entries: p.entries,
                        })
                        .collect(),
                    tallies: doc
                        .tallies
                        .iter()
                        .map(|&(category, count)| Tally {
                            category: category.to_string(),
                            count,
                        })
                        .collect(),
                    diagnostics: doc
                        .diagnostics
                        .iter()
                        .map(|d| JsonDiagnostic {
                            function: d.function.clone(),
                            line: d.line,
                            ids: d.ids.clone(),
                            severity: d.severity.letter().to_string(),
                            message: d.message.clone(),
                        })
                        .collect(),
                })
                .collect(),
        };
        // Safe to unwrap: our types always serialize successfully
        let _ = writeln!(out, "{}", serde_json::to_string_pretty(&output).unwrap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::fixtures::sample_summary;

    fn render(summary: &RunSummary) -> serde_json::Value {
        let mut buf = Vec::new();
        JsonFormatter.format_to(summary, &mut buf);
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn counts_and_documents() {
        let parsed = render(&sample_summary());
        assert_eq!(parsed["input"], "sprite.c");
        assert_eq!(parsed["warning_count"], 9);
        assert_eq!(parsed["review_count"], 0);
        assert_eq!(parsed["documents"].as_array().unwrap().len(), 3);
        let metadata = &parsed["documents"][0];
        assert_eq!(metadata["file"], "sprite_metadata.json");
        assert_eq!(metadata["records"], 2);
        assert_eq!(metadata["phases"][0]["pass"], "cut");
        assert_eq!(metadata["phases"][0]["entries"], 2);
        assert_eq!(metadata["tallies"][0]["category"], "Cut sprites");
    }

    #[test]
    fn diagnostic_fields_present() {
        let parsed = render(&sample_summary());
        let diags = parsed["documents"][0]["diagnostics"].as_array().unwrap();
        let unknown = diags
            .iter()
            .find(|d| d["ids"][0] == 200)
            .expect("diagnostic for case 200");
        assert_eq!(unknown["function"], "_is_cut_sprite");
        assert_eq!(unknown["severity"], "W");
        assert_eq!(unknown["line"], 5);
        assert!(unknown["message"].as_str().unwrap().contains("foo(x)"));
    }

    #[test]
    fn dry_run_omits_written() {
        let mut summary = sample_summary();
        summary.dry_run = true;
        for doc in &mut summary.documents {
            doc.written = None;
        }
        let parsed = render(&summary);
        assert_eq!(parsed["dry_run"], true);
        assert!(parsed["documents"][0].get("written").is_none());
    }
}

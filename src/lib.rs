pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod emit;
pub mod extract;
pub mod formatter;
pub mod idiom;
pub mod merge;
pub mod parse;
pub mod record;

#[cfg(test)]
pub mod testutil;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use cli::{Args, DEFAULT_OUTPUT_DIR};
use config::load_config;
use diagnostic::Severity;
use emit::write_document;
use extract::extract_all;
use formatter::{RunSummary, create_formatter};
use parse::source::{Encoding, SourceFile};

/// Run one extraction. Returns the exit code: 0 when the documents were
/// produced. A missing input file is an error and nothing is written.
pub fn run(args: Args) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;

    // --list-idioms: print every chain in priority order and exit
    if args.list_idioms {
        for (pass, field, names) in idiom::catalog() {
            println!("{pass:<10} {field:<14} {}", names.join(", "));
        }
        return Ok(0);
    }

    let kinds = args.documents()?;
    let source = SourceFile::from_path(&args.input)?;
    if source.encoding() == Encoding::Latin1 {
        warn!(path = %source.path_str(), "input is not valid UTF-8; decoded as Latin-1");
    }
    debug!(
        path = %source.path_str(),
        lines = source.line_count(),
        constants = config.constants.len(),
        "loaded source"
    );

    let documents = extract_all(&source, &config, &kinds);
    for doc in &documents {
        for d in doc.diagnostics() {
            match d.severity {
                Severity::Warning => warn!("{d}"),
                Severity::Review => info!("{d}"),
            }
        }
    }

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut summary = RunSummary::new(&args.input, args.dry_run);
    for doc in &documents {
        let written = if args.dry_run {
            None
        } else {
            Some(write_document(&output_dir, doc)?)
        };
        summary.push(doc, written);
    }

    create_formatter(&args.format).print(&summary);
    Ok(0)
}

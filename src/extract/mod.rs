//! Extraction passes over the sprite source.
//!
//! A pass reads one C function and contributes records to one output
//! document. Each pass is isolated: a missing function or an unrecognised
//! expression only affects that pass, and problems come back as diagnostics
//! in the pass's [`PhaseReport`].

pub mod metadata;
pub mod variants;

use tracing::debug;

use crate::config::ExtractConfig;
use crate::diagnostic::{Diagnostic, Severity};
use crate::parse::cases::CaseGroup;
use crate::parse::function::{FunctionBody, locate_function};
use crate::parse::source::SourceFile;
use crate::record::{MetadataRecord, VariantRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pass {
    Cut,
    Door,
    Mov,
    Yadd,
    Layer,
    Offset,
    NoLighting,
    Character,
    Animated,
}

impl Pass {
    pub const ALL: [Pass; 9] = [
        Pass::Cut,
        Pass::Door,
        Pass::Mov,
        Pass::Yadd,
        Pass::Layer,
        Pass::Offset,
        Pass::NoLighting,
        Pass::Character,
        Pass::Animated,
    ];

    /// Name used in config `functions` overrides.
    pub fn key(&self) -> &'static str {
        match self {
            Pass::Cut => "cut",
            Pass::Door => "door",
            Pass::Mov => "mov",
            Pass::Yadd => "yadd",
            Pass::Layer => "layer",
            Pass::Offset => "offset",
            Pass::NoLighting => "no_lighting",
            Pass::Character => "character",
            Pass::Animated => "animated",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn default_function(&self) -> &'static str {
        match self {
            Pass::Cut => "_is_cut_sprite",
            Pass::Door => "_is_door_sprite",
            Pass::Mov => "_is_mov_sprite",
            Pass::Yadd => "_is_yadd_sprite",
            Pass::Layer => "_get_lay_sprite",
            Pass::Offset => "_get_offset_sprite",
            Pass::NoLighting => "_no_lighting_sprite",
            Pass::Character => "_trans_charno",
            Pass::Animated => "_trans_asprite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Metadata,
    Character,
    Animated,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Metadata,
        DocumentKind::Character,
        DocumentKind::Animated,
    ];

    /// Name accepted by `--only`.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Metadata => "metadata",
            DocumentKind::Character => "character",
            DocumentKind::Animated => "animated",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::Metadata => "sprite_metadata.json",
            DocumentKind::Character => "character_variants.json",
            DocumentKind::Animated => "animated_variants.json",
        }
    }

    /// Top-level key holding the record list.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::Metadata => "sprite_metadata",
            DocumentKind::Character => "character_variants",
            DocumentKind::Animated => "animated_variants",
        }
    }

    /// Passes feeding this document, in merge order.
    pub fn passes(&self) -> &'static [Pass] {
        match self {
            DocumentKind::Metadata => &[
                Pass::Cut,
                Pass::Door,
                Pass::Mov,
                Pass::Yadd,
                Pass::Layer,
                Pass::Offset,
                Pass::NoLighting,
            ],
            DocumentKind::Character => &[Pass::Character],
            DocumentKind::Animated => &[Pass::Animated],
        }
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub pass: Pass,
    pub function: String,
    pub found: bool,
    /// Records the pass contributed, one per identifier.
    pub entries: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl PhaseReport {
    pub fn new(pass: Pass, function: &str) -> Self {
        Self {
            pass,
            function: function.to_string(),
            found: false,
            entries: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Record a problem tied to one case group of `body`.
    pub(crate) fn group_diagnostic(
        &mut self,
        source: &SourceFile,
        body: &FunctionBody<'_>,
        group: &CaseGroup,
        severity: Severity,
        message: impl Into<String>,
    ) {
        let line = source.offset_to_line(body.offset + group.offset);
        let diagnostic = match severity {
            Severity::Warning => Diagnostic::warning(&self.function, message),
            Severity::Review => Diagnostic::review(&self.function, message),
        };
        self.diagnostics
            .push(diagnostic.at_line(line).for_ids(&group.ids));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Records {
    Metadata(Vec<MetadataRecord>),
    Variants(Vec<VariantRecord>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::Metadata(r) => r.len(),
            Records::Variants(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One output document: merged records plus what each pass reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub kind: DocumentKind,
    pub phases: Vec<PhaseReport>,
    pub records: Records,
}

impl Document {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.phases.iter().flat_map(|p| p.diagnostics.iter())
    }

    /// Per-category counts over the merged records.
    pub fn tallies(&self) -> Vec<(&'static str, usize)> {
        fn count<R>(records: &[R], f: impl Fn(&R) -> bool) -> usize {
            records.iter().filter(|r| f(r)).count()
        }
        match &self.records {
            Records::Metadata(r) => vec![
                ("Cut sprites", count(r, |m| m.has_cut())),
                ("Door sprites", count(r, |m| m.door == Some(true))),
                ("Mov sprites", count(r, |m| m.mov.is_some())),
                ("Yadd sprites", count(r, |m| m.yadd.is_some())),
                ("Layer sprites", count(r, |m| m.layer.is_some())),
                ("Offset sprites", count(r, |m| m.has_offset())),
                ("No-lighting sprites", count(r, |m| m.no_lighting == Some(true))),
            ],
            Records::Variants(r) => vec![
                ("Remapped", count(r, |v| v.base_sprite.is_some_and(|b| b != i64::from(v.id)))),
                ("Animated", count(r, |v| v.animation.is_some())),
                ("Color pulses", count(r, |v| v.color_pulse.is_some())),
                ("Light pulses", count(r, |v| v.light_pulse.is_some())),
                (
                    "Packed colors",
                    count(r, |v| v.c1.is_some() || v.c2.is_some() || v.c3.is_some()),
                ),
                ("Needs review", count(r, |v| v.needs_review.is_some())),
            ],
        }
    }
}

/// Find the pass's function, noting a missing or unbalanced body.
pub(crate) fn locate<'a>(
    source: &'a SourceFile,
    report: &mut PhaseReport,
) -> Option<FunctionBody<'a>> {
    let Some(body) = locate_function(source.text(), &report.function) else {
        report
            .diagnostics
            .push(Diagnostic::warning(&report.function, "function not found"));
        return None;
    };
    report.found = true;
    if !body.complete {
        report.diagnostics.push(
            Diagnostic::warning(
                &report.function,
                "no closing brace before end of file; using the rest of the file as the body",
            )
            .at_line(source.offset_to_line(body.offset)),
        );
    }
    debug!(
        function = %report.function,
        bytes = body.text.len(),
        "located function body"
    );
    Some(body)
}

/// Collapse runs of whitespace so multi-line code fits in one message.
pub(crate) fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_document(
    source: &SourceFile,
    config: &ExtractConfig,
    kind: DocumentKind,
) -> Document {
    match kind {
        DocumentKind::Metadata => metadata::extract_metadata(source, config),
        DocumentKind::Character | DocumentKind::Animated => {
            variants::extract_variants(source, config, kind)
        }
    }
}

/// Run every requested document's passes over one source. Pure in the
/// source text: the same input always yields the same documents.
pub fn extract_all(
    source: &SourceFile,
    config: &ExtractConfig,
    kinds: &[DocumentKind],
) -> Vec<Document> {
    kinds
        .iter()
        .map(|&kind| extract_document(source, config, kind))
        .collect()
}

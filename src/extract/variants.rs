//! The variant passes: `_trans_charno` and `_trans_asprite`.
//!
//! Both functions are one big switch whose cases fall through into each other
//! until a `break;`. Each case group yields one record per identifier with the
//! remap, static channel, packed color and pulse fields its code sets.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Document, DocumentKind, Pass, PhaseReport, Records, locate, one_line};
use crate::config::ExtractConfig;
use crate::diagnostic::Severity;
use crate::idiom::color::{CHANNELS, PACKED};
use crate::idiom::pulse::{COLOR_PULSE, LIGHT_PULSE, TICK_MASK};
use crate::idiom::remap::{ANIMATED_REMAP, CHARACTER_REMAP, Remap};
use crate::idiom::{IdiomChain, Scope};
use crate::merge::Merger;
use crate::parse::cases::{CaseGroup, FallThrough, segment, strip_comments};
use crate::parse::source::SourceFile;
use crate::record::{ColorChannel, VariantRecord};

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bbreak\s*;").unwrap());

static TRAILING_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^break\s*;[ \t]*//[ \t]*([^\n]*)").unwrap());

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[ \t]*([^\n]*)").unwrap());

static ABS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\babs\s*\(").unwrap());

static CHANNEL_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(c[123])\s*=[^=]").unwrap());

static DYNAMIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bif\s*\(|\bhelper\b|\brrand\b").unwrap());

static TICK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\battick\b").unwrap());

/// Characters of body text kept on a record flagged for review.
const REVIEW_TEXT_LIMIT: usize = 500;

struct VariantPass {
    remap: &'static IdiomChain<Remap>,
    sprite_var: &'static str,
    /// `attick & N` pulses on `cr` are a character idiom only.
    tick_mask: bool,
}

impl VariantPass {
    fn for_kind(kind: DocumentKind) -> (Pass, Self) {
        match kind {
            DocumentKind::Character => (
                Pass::Character,
                Self {
                    remap: &CHARACTER_REMAP,
                    sprite_var: "csprite",
                    tick_mask: true,
                },
            ),
            _ => (
                Pass::Animated,
                Self {
                    remap: &ANIMATED_REMAP,
                    sprite_var: "sprite",
                    tick_mask: false,
                },
            ),
        }
    }
}

pub fn extract_variants(source: &SourceFile, config: &ExtractConfig, kind: DocumentKind) -> Document {
    let (pass, variant_pass) = VariantPass::for_kind(kind);
    let mut report = PhaseReport::new(pass, config.function_for(pass));
    let mut merger = Merger::new();

    if let Some(body) = locate(source, &mut report) {
        let code = strip_comments(body.text);
        let groups = segment(&code, &BREAK_RE, FallThrough::Resolved);
        debug!(function = %report.function, groups = groups.len(), "segmented variant cases");
        for group in &groups {
            let comment = capture_comment(&body.text[group.span.clone()], &code[group.span.clone()]);
            let records = variant_pass.build(group, comment, |severity, message| {
                report.group_diagnostic(source, &body, group, severity, message)
            });
            merger.extend(records);
        }
    }

    let records = merger.finish();
    report.entries = records.len();
    Document {
        kind,
        phases: vec![report],
        records: Records::Variants(records),
    }
}

/// A `//` comment on the line of the terminating `break;`, else the first
/// `//` comment before it. `raw` and `blanked` are the same span before and
/// after comment removal, so offsets agree.
fn capture_comment(raw: &str, blanked: &str) -> Option<String> {
    let at = BREAK_RE.find(blanked)?.start();
    let caps = TRAILING_COMMENT_RE
        .captures(&raw[at..])
        .or_else(|| LINE_COMMENT_RE.captures(&raw[..at]))?;
    let comment = caps[1].trim();
    (!comment.is_empty()).then(|| comment.to_string())
}

impl VariantPass {
    fn build(
        &self,
        group: &CaseGroup,
        comment: Option<String>,
        mut diagnose: impl FnMut(Severity, String),
    ) -> Vec<VariantRecord> {
        let code = group.body();
        let scope = Scope::new(group.ids[0], code);

        let mut shared = VariantRecord {
            comment,
            color_pulse: COLOR_PULSE.value(&scope),
            light_pulse: LIGHT_PULSE.value(&scope),
            ..VariantRecord::default()
        };
        for chain in CHANNELS.iter() {
            if let Some(value) = chain.value(&scope) {
                shared.set_channel(chain.field(), value);
            }
        }
        if let Some(colors) = PACKED.value(&scope) {
            shared.c1 = colors.c1;
            shared.c2 = colors.c2;
            shared.c3 = colors.c3;
        }

        let remap = self.remap.first_match(&scope);
        let tick_mask = if self.tick_mask { TICK_MASK.value(&scope) } else { None };
        if remap.is_none() {
            diagnose(
                Severity::Warning,
                format!("unrecognized {} assignment in `{}`", self.sprite_var, one_line(code)),
            );
        }
        if ABS_RE.is_match(code) && shared.color_pulse.is_none() && shared.light_pulse.is_none() {
            diagnose(
                Severity::Warning,
                format!("unrecognized pulse expression in `{}`", one_line(code)),
            );
        }
        for channel in unmatched_channels(code, &shared) {
            diagnose(Severity::Warning, format!("unrecognized {channel} value"));
        }

        let mut records = Vec::with_capacity(group.ids.len());
        for &id in &group.ids {
            let mut record = shared.clone();
            record.id = id;
            if remap.is_some() {
                if let Some(remap) = self.remap.value(&Scope::new(id, code)) {
                    record.base_sprite = Some(remap.base_sprite);
                    record.animation = remap.animation;
                }
            }
            if record.animation.is_none() {
                record.animation = tick_mask.clone();
            }
            record.needs_review = review_text(code, &record, tick_mask.is_some());
            records.push(record);
        }

        if records.iter().any(|r| r.needs_review.is_some()) {
            diagnose(
                Severity::Review,
                format!("needs manual review: `{}`", truncate(&one_line(code), 120)),
            );
        }
        records
    }
}

/// `cN = ...` assignments that neither the packed color nor the color pulse
/// idioms accounted for.
fn unmatched_channels(code: &str, record: &VariantRecord) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in CHANNEL_ASSIGN_RE.captures_iter(code) {
        let name = &caps[1];
        let Some(channel) = ColorChannel::parse(name) else {
            continue;
        };
        let packed = match channel {
            ColorChannel::C1 => record.c1,
            ColorChannel::C2 => record.c2,
            ColorChannel::C3 => record.c3,
        };
        let pulsed = record.color_pulse.as_ref().is_some_and(|p| p.target == channel);
        if packed.is_none() && !pulsed && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Body text to keep when the case holds constructs no idiom fully covers:
/// conditionals, `helper`/`rrand` logic, or a tick reference that produced
/// no animation. The tick-mask idiom accounts for its own `if`/`helper` code.
fn review_text(code: &str, record: &VariantRecord, tick_mask: bool) -> Option<String> {
    let dynamic = DYNAMIC_RE.is_match(code) && !tick_mask;
    let stray_tick = TICK_RE.is_match(code) && !record.has_animation();
    (dynamic || stray_tick).then(|| truncate(code.trim(), REVIEW_TEXT_LIMIT))
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

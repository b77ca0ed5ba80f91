//! Switch body segmentation into case groups.
//!
//! A case group is one or more `case N:` labels that share a single outcome.
//! Two policies decide how labels without a terminator of their own are
//! treated, see [`FallThrough`].

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CASE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcase\s+(\d+)\s*:").unwrap());

static DEFAULT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdefault\s*:").unwrap());

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseLabel {
    pub id: u32,
    /// Offset of the `case` keyword.
    pub start: usize,
    /// Offset just after the `:`.
    pub body_start: usize,
    /// End of the label's own span: the next case label, a `default:` label,
    /// or the end of the body, whichever comes first.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallThrough {
    /// Labels with an empty span join the next terminated case; a label whose
    /// span has code but no terminator has no value and is dropped.
    Grouped,
    /// A label without a terminator takes every following span up to and
    /// including the first one that has a terminator. Chains that never
    /// terminate are dropped, as are chains with nothing before the terminator.
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseGroup {
    pub ids: Vec<u32>,
    /// Shared body text with interior case labels removed.
    pub text: String,
    /// Byte offset of the terminator match within `text`.
    pub terminator: usize,
    /// Byte offset of the group's first label within the function body.
    pub offset: usize,
    /// Range of the function body the group was cut from, labels included.
    pub span: Range<usize>,
}

impl CaseGroup {
    /// Statements before the terminator.
    pub fn body(&self) -> &str {
        &self.text[..self.terminator]
    }

    /// The terminator and whatever follows it up to the end of the span.
    pub fn tail(&self) -> &str {
        &self.text[self.terminator..]
    }
}

/// Every `case <int>:` label in source order.
pub fn case_labels(body: &str) -> Vec<CaseLabel> {
    let defaults: Vec<usize> = DEFAULT_LABEL_RE.find_iter(body).map(|m| m.start()).collect();
    let mut labels: Vec<CaseLabel> = CASE_LABEL_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps[1].parse().ok()?;
            Some(CaseLabel {
                id,
                start: whole.start(),
                body_start: whole.end(),
                end: body.len(),
            })
        })
        .collect();

    let next_starts: Vec<usize> = labels.iter().skip(1).map(|l| l.start).collect();
    for (i, label) in labels.iter_mut().enumerate() {
        let next_case = next_starts.get(i).copied().unwrap_or(body.len());
        let next_default = defaults
            .iter()
            .copied()
            .find(|&d| d >= label.body_start)
            .unwrap_or(body.len());
        label.end = next_case.min(next_default);
    }
    labels
}

/// Split a function body into case groups that end at `terminator`.
pub fn segment(body: &str, terminator: &Regex, policy: FallThrough) -> Vec<CaseGroup> {
    let labels = case_labels(body);
    match policy {
        FallThrough::Grouped => group_by_terminator(body, &labels, terminator),
        FallThrough::Resolved => resolve_chains(body, &labels, terminator),
    }
}

fn group_by_terminator(body: &str, labels: &[CaseLabel], terminator: &Regex) -> Vec<CaseGroup> {
    let mut groups = Vec::new();
    let mut pending: Vec<u32> = Vec::new();
    let mut pending_offset = None;

    for label in labels {
        let span = &body[label.body_start..label.end];
        pending.push(label.id);
        let offset = *pending_offset.get_or_insert(label.start);

        if let Some(m) = terminator.find(span) {
            groups.push(CaseGroup {
                ids: std::mem::take(&mut pending),
                text: span.to_string(),
                terminator: m.start(),
                offset,
                span: label.body_start..label.end,
            });
            pending_offset = None;
        } else if !is_blank(span) {
            pending.clear();
            pending_offset = None;
        }
    }
    groups
}

fn resolve_chains(body: &str, labels: &[CaseLabel], terminator: &Regex) -> Vec<CaseGroup> {
    let mut groups: Vec<CaseGroup> = Vec::new();
    let mut last_chain_end = None;

    for (i, label) in labels.iter().enumerate() {
        let Some(last) = (i..labels.len())
            .find(|&j| terminator.is_match(&body[labels[j].body_start..labels[j].end]))
        else {
            continue;
        };

        let raw = &body[label.body_start..labels[last].end];
        let text = CASE_LABEL_RE.replace_all(raw, "").into_owned();
        let Some(m) = terminator.find(&text) else {
            continue;
        };
        if is_blank(&text[..m.start()]) {
            continue;
        }

        // Consecutive labels that resolved to the same terminator and the same
        // code are one group.
        if let Some(group) = groups.last_mut() {
            if last_chain_end == Some(last) && same_code(&group.text, &text) {
                group.ids.push(label.id);
                continue;
            }
        }
        groups.push(CaseGroup {
            ids: vec![label.id],
            terminator: m.start(),
            text,
            offset: label.start,
            span: label.body_start..labels[last].end,
        });
        last_chain_end = Some(last);
    }
    groups
}

fn same_code(a: &str, b: &str) -> bool {
    let a = strip_comments(a);
    let b = strip_comments(b);
    a.split_whitespace().eq(b.split_whitespace())
}

/// Blank out `//` and `/* */` comments. Byte offsets and line breaks are
/// preserved, so positions in the result are positions in `text`.
pub fn strip_comments(text: &str) -> String {
    COMMENT_RE
        .replace_all(text, |caps: &Captures<'_>| {
            caps[0]
                .chars()
                .map(|c| if c == '\n' { "\n".to_string() } else { " ".repeat(c.len_utf8()) })
                .collect::<String>()
        })
        .into_owned()
}

/// True when `text` holds nothing but whitespace and comments.
pub fn is_blank(text: &str) -> bool {
    strip_comments(text).trim().is_empty()
}

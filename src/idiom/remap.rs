//! Sprite remapping in the variant functions.
//!
//! The variant functions rewrite their sprite variable (`csprite` in
//! `_trans_charno`, `sprite` in `_trans_asprite`) to pick the frame a variant
//! is drawn from, optionally cycling through frames on the animation tick.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Idiom, IdiomChain, Scope, cap};
use crate::record::Animation;

static DIVISOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\battick\)?\s*/\s*(\d+)").unwrap());

static POSITION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bmn\s*%\s*MAPDX").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
    pub base_sprite: i64,
    pub animation: Option<Animation>,
}

impl Remap {
    fn fixed(base_sprite: i64) -> Self {
        Self {
            base_sprite,
            animation: None,
        }
    }

    fn cycling(base_sprite: i64, frames: u32, text: &str) -> Self {
        let divisor = DIVISOR_RE
            .captures(text)
            .and_then(|c| cap(&c, 1))
            .unwrap_or(1);
        let positional = POSITION_RE.is_match(text);
        Self {
            base_sprite,
            animation: Some(Animation::cycle(frames, divisor, positional)),
        }
    }
}

fn plus_minus(c: &Captures<'_>, scope: &Scope<'_>) -> Option<Remap> {
    let a: i64 = cap(c, 1)?;
    let b: i64 = cap(c, 2)?;
    let base = i64::from(scope.id).checked_add(a)?.checked_sub(b)?;
    Some(Remap::fixed(base))
}

fn minus_plus(c: &Captures<'_>, scope: &Scope<'_>) -> Option<Remap> {
    let a: i64 = cap(c, 1)?;
    let b: i64 = cap(c, 2)?;
    let base = i64::from(scope.id).checked_sub(a)?.checked_add(b)?;
    Some(Remap::fixed(base))
}

fn base_cycle(c: &Captures<'_>, scope: &Scope<'_>) -> Option<Remap> {
    Some(Remap::cycling(cap(c, 1)?, cap(c, 2)?, scope.text))
}

fn self_cycle(c: &Captures<'_>, scope: &Scope<'_>) -> Option<Remap> {
    Some(Remap::cycling(i64::from(scope.id), cap(c, 1)?, scope.text))
}

fn direct(c: &Captures<'_>, _: &Scope<'_>) -> Option<Remap> {
    cap(c, 1).map(Remap::fixed)
}

/// Matches when the body never assigns the sprite variable: the case
/// identifier is drawn as-is.
struct Unassigned {
    assignment: Regex,
}

impl Idiom<Remap> for Unassigned {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, scope: &Scope<'_>) -> Option<Remap> {
        if self.assignment.is_match(scope.text) {
            None
        } else {
            Some(Remap::fixed(i64::from(scope.id)))
        }
    }
}

fn assignment_regex(var: &str) -> Regex {
    Regex::new(&format!(r"\b{}\s*(?:[-+*/%&|]?=)[^=]", regex::escape(var))).unwrap()
}

fn remap_chain(var: &str) -> IdiomChain<Remap> {
    let v = regex::escape(var);
    IdiomChain::new("base_sprite")
        .pattern(
            "offset-plus-minus",
            &format!(r"\b{v}\s*=\s*{v}\s*\+\s*(\d+)\s*-\s*(\d+)\s*;"),
            plus_minus,
        )
        .pattern(
            "offset-minus-plus",
            &format!(r"\b{v}\s*=\s*{v}\s*-\s*(\d+)\s*\+\s*(\d+)\s*;"),
            minus_plus,
        )
        .pattern(
            "base-cycle",
            &format!(r"\b{v}\s*=\s*(\d+)\s*\+[^;]*?%\s*(\d+)"),
            base_cycle,
        )
        .pattern(
            "self-cycle",
            &format!(r"\b{v}\s*=\s*{v}\s*\+[^;]*?%\s*(\d+)"),
            self_cycle,
        )
        .pattern("direct", &format!(r"\b{v}\s*=\s*(\d+)\s*;"), direct)
        .with(Unassigned {
            assignment: assignment_regex(var),
        })
}

pub static CHARACTER_REMAP: LazyLock<IdiomChain<Remap>> =
    LazyLock::new(|| remap_chain("csprite"));

pub static ANIMATED_REMAP: LazyLock<IdiomChain<Remap>> = LazyLock::new(|| remap_chain("sprite"));

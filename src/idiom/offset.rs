//! `_get_offset_sprite` pixel offsets: `*px = N;` and `*py = N;` in one case.

use std::sync::LazyLock;

use regex::Regex;

use super::{Idiom, IdiomChain, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: i64,
    pub y: i64,
}

/// Two independent assignments, each optional. A missing axis is 0.
pub struct PairAssignment {
    x: Regex,
    y: Regex,
}

impl PairAssignment {
    pub fn new() -> Self {
        Self {
            x: Regex::new(r"(?:\*\s*p|\b)x\s*=\s*(-?\d+)\s*;").unwrap(),
            y: Regex::new(r"(?:\*\s*p|\b)y\s*=\s*(-?\d+)\s*;").unwrap(),
        }
    }
}

impl Default for PairAssignment {
    fn default() -> Self {
        Self::new()
    }
}

fn axis(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)?[1].parse().ok()
}

impl Idiom<PixelOffset> for PairAssignment {
    fn name(&self) -> &'static str {
        "pair-assignment"
    }

    fn apply(&self, scope: &Scope<'_>) -> Option<PixelOffset> {
        let x = axis(&self.x, scope.text);
        let y = axis(&self.y, scope.text);
        if x.is_none() && y.is_none() {
            return None;
        }
        Some(PixelOffset {
            x: x.unwrap_or(0),
            y: y.unwrap_or(0),
        })
    }
}

pub static OFFSET: LazyLock<IdiomChain<PixelOffset>> =
    LazyLock::new(|| IdiomChain::new("offset").with(PairAssignment::new()));

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(text: &str) -> Option<PixelOffset> {
        OFFSET.value(&Scope::new(0, text))
    }

    #[test]
    fn both_axes() {
        assert_eq!(
            offset("*px = -8; *py = 12;"),
            Some(PixelOffset { x: -8, y: 12 })
        );
    }

    #[test]
    fn missing_axis_defaults_to_zero() {
        assert_eq!(offset("\n\t*py=-4;\n"), Some(PixelOffset { x: 0, y: -4 }));
        assert_eq!(offset("x = 3;"), Some(PixelOffset { x: 3, y: 0 }));
    }

    #[test]
    fn other_identifiers_ending_in_x_are_ignored() {
        assert_eq!(offset("idx = 3;"), None);
        assert_eq!(offset("*px = dx;"), None);
    }
}

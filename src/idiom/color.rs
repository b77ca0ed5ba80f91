//! Static channel assignments and 15-bit packed colors.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Idiom, IdiomChain, Scope};

/// A packed color literal: `IRGB(r, g, b)`, hex, or decimal, ending the
/// statement or argument.
const COLOR_VALUE: &str = r"(IRGB\s*\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*\)|0[xX][0-9a-fA-F]+|\d+)\s*[;,)]";

static IRGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^IRGB\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)$").unwrap()
});

/// `(r << 10) | (g << 5) | b`, each channel masked to its low 5 bits.
pub fn pack(r: u32, g: u32, b: u32) -> u32 {
    ((r & 31) << 10) | ((g & 31) << 5) | (b & 31)
}

pub fn unpack(value: u32) -> (u32, u32, u32) {
    ((value >> 10) & 31, (value >> 5) & 31, value & 31)
}

/// Value of an `IRGB(..)`, hex, or decimal literal.
pub fn parse_color(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(c) = IRGB_RE.captures(text) {
        // Oversized channel arguments still pack to their low bits.
        let channel = |i: usize| -> Option<u32> {
            let n: u64 = c[i].parse().ok()?;
            Some((n & 31) as u32)
        };
        return Some(pack(channel(1)?, channel(2)?, channel(3)?));
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    text.parse().ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackedColors {
    pub c1: Option<u32>,
    pub c2: Option<u32>,
    pub c3: Option<u32>,
}

fn chained(c: &Captures<'_>, _: &Scope<'_>) -> Option<PackedColors> {
    let value = parse_color(&c[1])?;
    Some(PackedColors {
        c1: Some(value),
        c2: Some(value),
        c3: Some(value),
    })
}

/// Up to three unrelated `cN = VALUE` statements.
struct PerChannel {
    channels: [Regex; 3],
}

impl PerChannel {
    fn new() -> Self {
        let re = |name: &str| Regex::new(&format!(r"\b{name}\s*=\s*{COLOR_VALUE}")).unwrap();
        Self {
            channels: [re("c1"), re("c2"), re("c3")],
        }
    }
}

impl Idiom<PackedColors> for PerChannel {
    fn name(&self) -> &'static str {
        "per-channel"
    }

    fn apply(&self, scope: &Scope<'_>) -> Option<PackedColors> {
        let [c1, c2, c3] = self
            .channels
            .each_ref()
            .map(|re| re.captures(scope.text).and_then(|c| parse_color(&c[1])));
        if c1.is_none() && c2.is_none() && c3.is_none() {
            return None;
        }
        Some(PackedColors { c1, c2, c3 })
    }
}

pub static PACKED: LazyLock<IdiomChain<PackedColors>> = LazyLock::new(|| {
    IdiomChain::new("c1/c2/c3")
        .pattern(
            "chained-assignment",
            &format!(r"\bc1\s*=\s*c2\s*=\s*c3\s*=\s*{COLOR_VALUE}"),
            chained,
        )
        .with(PerChannel::new())
});

/// Source variable and output field of each static channel.
pub const STATIC_CHANNELS: [(&str, &str); 7] = [
    ("scale", "scale"),
    ("cr", "cr"),
    ("cg", "cg"),
    ("cb", "cb"),
    ("light", "light"),
    ("sat", "saturation"),
    ("shine", "shine"),
];

/// One chain per static channel, in [`STATIC_CHANNELS`] order. Only a literal
/// that ends the statement counts, so `cr = 60 + helper * 3` is not `cr = 60`.
pub static CHANNELS: LazyLock<Vec<IdiomChain<i64>>> = LazyLock::new(|| {
    STATIC_CHANNELS
        .iter()
        .map(|&(var, field)| {
            IdiomChain::new(field).pattern(
                "literal-assignment",
                &format!(r"\b{var}\s*=\s*(-?\d+)\s*[;,)]"),
                |c, _| c[1].parse().ok(),
            )
        })
        .collect()
});

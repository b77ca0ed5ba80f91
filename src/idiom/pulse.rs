//! Tick-driven pulses: `abs(max - (attick % period)) [/ div] [+ off]` on a
//! color channel or on the light level, and the `attick & mask` oscillator.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{IdiomChain, Scope, cap};
use crate::record::{Animation, ColorChannel, ColorPulse, LightPulse};

/// The pulse formula shared by color and light: `abs(MAX - (attick % PERIOD))`
/// followed by an optional `/ DIV` and `+ OFF`.
const ABS_TICK: &str = r"abs\s*\(\s*(\d+)\s*-\s*\(\s*attick\s*%\s*(\d+)\s*\)\s*\)(?:\s*/\s*(\d+))?(?:\s*\+\s*(\d+))?";

static CR_HELPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcr\s*=\s*(\d+)\s*\+\s*helper\s*\*\s*(\d+)").unwrap());

/// Optional divisor and offset groups, defaulting to 1 and 0.
fn tail(c: &Captures<'_>, div: usize) -> (u32, u32) {
    (cap(c, div).unwrap_or(1), cap(c, div + 1).unwrap_or(0))
}

fn color_pulse(c: &Captures<'_>, _: &Scope<'_>) -> Option<ColorPulse> {
    let (divisor, offset) = tail(c, 6);
    Some(ColorPulse {
        target: ColorChannel::parse(&c[1])?,
        r: cap(c, 2)?,
        g: cap(c, 3)?,
        max_blue: cap(c, 4)?,
        period: cap(c, 5)?,
        divisor,
        offset,
    })
}

fn light_pulse(c: &Captures<'_>, _: &Scope<'_>) -> Option<LightPulse> {
    let (divisor, offset) = tail(c, 3);
    Some(LightPulse {
        max: cap(c, 1)?,
        period: cap(c, 2)?,
        divisor,
        offset,
    })
}

fn tick_mask(c: &Captures<'_>, scope: &Scope<'_>) -> Option<Animation> {
    let mask: u32 = cap(c, 1)?;
    let period = mask.checked_add(1)?;
    let (base, amplitude) = match CR_HELPER_RE.captures(scope.text) {
        Some(h) => {
            let base: i64 = cap(&h, 1)?;
            let step: i64 = cap(&h, 2)?;
            (Some(base), Some(step.checked_mul(i64::from(period / 2))?))
        }
        None => (None, None),
    };
    Some(Animation::Pulse {
        period,
        affects: "cr".to_string(),
        base,
        amplitude,
    })
}

/// `cN = IRGB(r, g, abs(...))`: blue pulses, red and green stay fixed.
pub static COLOR_PULSE: LazyLock<IdiomChain<ColorPulse>> = LazyLock::new(|| {
    IdiomChain::new("color_pulse").pattern(
        "irgb-abs-tick",
        &format!(r"\b(c[123])\s*=\s*IRGB\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*{ABS_TICK}\s*\)"),
        color_pulse,
    )
});

pub static LIGHT_PULSE: LazyLock<IdiomChain<LightPulse>> = LazyLock::new(|| {
    IdiomChain::new("light_pulse").pattern(
        "abs-tick",
        &format!(r"\blight\s*=\s*{ABS_TICK}"),
        light_pulse,
    )
});

/// `attick & N` drives a red-channel oscillation with period `N + 1`; the
/// `cr = B + helper * K` line, when present, gives its base and amplitude.
pub static TICK_MASK: LazyLock<IdiomChain<Animation>> = LazyLock::new(|| {
    IdiomChain::new("animation").pattern("tick-mask", r"\battick\s*&\s*(\d+)", tick_mask)
});

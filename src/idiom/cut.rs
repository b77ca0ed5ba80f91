//! `_is_cut_sprite` return expressions.
//!
//! The cut counterpart of a sprite is either an offset from the sprite itself
//! (`(int)(sprite + 3)`, optionally negated as a whole) or a fixed sprite
//! number. Every pattern is anchored to the full return expression, so a
//! looser form can never match inside a more specific one.

use std::sync::LazyLock;

use regex::Captures;

use super::{IdiomChain, Scope, cap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutValue {
    /// Counterpart is `id + offset`, sign-negated when `negative`.
    Offset { offset: i64, negative: bool },
    /// Counterpart is this sprite number. `0` means "no cut" but is still data.
    Sprite(u32),
}

fn offset(c: &Captures<'_>, negate_offset: bool, negative: bool) -> Option<CutValue> {
    let n: i64 = cap(c, 1)?;
    Some(CutValue::Offset {
        offset: if negate_offset { -n } else { n },
        negative,
    })
}

fn plus(c: &Captures<'_>, _: &Scope<'_>) -> Option<CutValue> {
    offset(c, false, false)
}

fn minus(c: &Captures<'_>, _: &Scope<'_>) -> Option<CutValue> {
    offset(c, true, false)
}

fn neg_plus(c: &Captures<'_>, _: &Scope<'_>) -> Option<CutValue> {
    offset(c, false, true)
}

fn neg_minus(c: &Captures<'_>, _: &Scope<'_>) -> Option<CutValue> {
    offset(c, true, true)
}

pub static CUT: LazyLock<IdiomChain<CutValue>> = LazyLock::new(|| {
    IdiomChain::new("cut")
        .pattern(
            "neg-cast-plus",
            r"^-\s*\(\s*int\s*\)\s*\(\s*sprite\s*\+\s*(\d+)\s*\)$",
            neg_plus,
        )
        .pattern(
            "neg-cast-minus",
            r"^-\s*\(\s*int\s*\)\s*\(\s*sprite\s*-\s*(\d+)\s*\)$",
            neg_minus,
        )
        .pattern(
            "cast-plus",
            r"^\(\s*int\s*\)\s*\(\s*sprite\s*\+\s*(\d+)\s*\)$",
            plus,
        )
        .pattern(
            "cast-minus",
            r"^\(\s*int\s*\)\s*\(\s*sprite\s*-\s*(\d+)\s*\)$",
            minus,
        )
        .pattern("plus", r"^sprite\s*\+\s*(\d+)$", plus)
        .pattern("minus", r"^sprite\s*-\s*(\d+)$", minus)
        .pattern(
            "neg-paren-plus",
            r"^-\s*\(\s*sprite\s*\+\s*(\d+)\s*\)$",
            neg_plus,
        )
        .pattern(
            "neg-paren-minus",
            r"^-\s*\(\s*sprite\s*-\s*(\d+)\s*\)$",
            neg_minus,
        )
        .pattern("literal", r"^(\d+)$", |c, _| cap(c, 1).map(CutValue::Sprite))
});

#[cfg(test)]
mod tests {
    use super::*;

    fn cut(expr: &str) -> Option<(&'static str, CutValue)> {
        CUT.first_match(&Scope::new(1000, expr))
            .map(|m| (m.idiom, m.value))
    }

    /// The value the C function returns for sprite `id`.
    fn resolve(value: CutValue, id: u32) -> i64 {
        match value {
            CutValue::Offset { offset, negative } => {
                let v = i64::from(id) + offset;
                if negative { -v } else { v }
            }
            CutValue::Sprite(sprite) => i64::from(sprite),
        }
    }

    #[test]
    fn cast_plus() {
        assert_eq!(
            cut("(int)(sprite + 3)"),
            Some((
                "cast-plus",
                CutValue::Offset {
                    offset: 3,
                    negative: false
                }
            ))
        );
    }

    #[test]
    fn negated_cast_beats_plain_cast() {
        let (name, value) = cut("-(int)(sprite + 1)").unwrap();
        assert_eq!(name, "neg-cast-plus");
        assert_eq!(
            value,
            CutValue::Offset {
                offset: 1,
                negative: true
            }
        );
    }

    #[test]
    fn minus_forms_store_negative_offset() {
        assert_eq!(
            cut("(int)(sprite - 2)").unwrap().1,
            CutValue::Offset {
                offset: -2,
                negative: false
            }
        );
        assert_eq!(
            cut("-(sprite - 4)").unwrap(),
            (
                "neg-paren-minus",
                CutValue::Offset {
                    offset: -4,
                    negative: true
                }
            )
        );
        assert_eq!(cut("sprite-1").unwrap().0, "minus");
    }

    #[test]
    fn zero_literal_is_a_value() {
        assert_eq!(cut("0"), Some(("literal", CutValue::Sprite(0))));
        assert_eq!(cut("16123").unwrap().1, CutValue::Sprite(16123));
    }

    #[test]
    fn unknown_expressions_do_not_match() {
        assert_eq!(cut("foo(x)"), None);
        assert_eq!(cut("sprite * 2"), None);
        assert_eq!(cut("(int)(sprite + 3) + 1"), None);
    }

    #[test]
    fn resolve_matches_c_semantics() {
        let neg = CutValue::Offset {
            offset: 3,
            negative: true,
        };
        assert_eq!(resolve(neg, 10), -13);
        assert_eq!(resolve(CutValue::Sprite(7), 10), 7);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_reconstructs_returned_value(
                id in 0u32..1_000_000,
                n in 0i64..100_000,
                sub in any::<bool>(),
                negate in any::<bool>(),
                cast in any::<bool>(),
            ) {
                let op = if sub { '-' } else { '+' };
                let inner = if cast {
                    format!("(int)(sprite {op} {n})")
                } else if negate {
                    format!("(sprite {op} {n})")
                } else {
                    format!("sprite {op} {n}")
                };
                let expr = if negate { format!("-{inner}") } else { inner };

                let expected = {
                    let v = if sub { i64::from(id) - n } else { i64::from(id) + n };
                    if negate { -v } else { v }
                };
                let value = CUT.value(&Scope::new(id, &expr)).unwrap();
                prop_assert_eq!(resolve(value, id), expected);
            }
        }
    }
}

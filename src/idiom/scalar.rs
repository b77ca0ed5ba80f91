//! Single-literal return values (`_is_mov_sprite`, `_is_yadd_sprite`).

use std::sync::LazyLock;

use super::{IdiomChain, cap};

/// Signed movement hint.
pub static MOV: LazyLock<IdiomChain<i64>> = LazyLock::new(|| {
    IdiomChain::new("mov").pattern("literal", r"^(-?\s*\d+)$", |c, _| {
        c[1].replace(char::is_whitespace, "").parse().ok()
    })
});

/// Unsigned vertical offset.
pub static YADD: LazyLock<IdiomChain<u32>> =
    LazyLock::new(|| IdiomChain::new("yadd").pattern("literal", r"^(\d+)$", |c, _| cap(c, 1)));

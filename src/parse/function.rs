//! Function body location by signature match and brace counting.

use std::sync::LazyLock;

use regex::Regex;

/// `[DLL_EXPORT] [unsigned] int name(params...) {`. The parameter list may
/// span lines; declarations ending in `;` never match because `{` is required.
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\bDLL_EXPORT\s+)?(?:\bunsigned\s+)?\bint\s+([A-Za-z_]\w*)\s*\([^)]*\)\s*\{")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody<'a> {
    /// Text between the opening and closing brace (both excluded).
    pub text: &'a str,
    /// Byte offset of `text` within the whole source.
    pub offset: usize,
    /// False when the source ended before the closing brace was found.
    pub complete: bool,
}

/// Find the definition of `name` and return its body.
///
/// Nested blocks are handled by tracking brace depth from the opening `{`
/// until it returns to zero.
pub fn locate_function<'a>(source: &'a str, name: &str) -> Option<FunctionBody<'a>> {
    let open = SIGNATURE_RE
        .captures_iter(source)
        .find(|caps| &caps[1] == name)?
        .get(0)?
        .end();
    let (close, complete) = match matching_brace(source, open) {
        Some(close) => (close, true),
        None => (source.len(), false),
    };
    Some(FunctionBody {
        text: &source[open..close],
        offset: open,
        complete,
    })
}

/// Offset of the `}` that closes a block whose `{` ends right before `start`.
fn matching_brace(source: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &b) in source.as_bytes()[start..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

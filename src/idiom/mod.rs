//! Ordered idiom chains.
//!
//! Each field the extractor recovers has an [`IdiomChain`]: a list of
//! recognisers tried most-specific first. The first idiom that matches a case
//! body decides the field's value; a chain with no match leaves the field unset.

pub mod color;
pub mod cut;
pub mod layer;
pub mod offset;
pub mod pulse;
pub mod remap;
pub mod scalar;

use regex::{Captures, Regex};

/// The text an idiom is matched against, together with the case identifier
/// the text belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub id: u32,
    pub text: &'a str,
}

impl<'a> Scope<'a> {
    pub fn new(id: u32, text: &'a str) -> Self {
        Self { id, text }
    }
}

/// A single syntactic shape mapped to a typed value. Implementations must be
/// Send + Sync so chains can live in statics.
pub trait Idiom<T>: Send + Sync {
    /// Short kebab-case name, e.g. "neg-cast-plus".
    fn name(&self) -> &'static str;

    fn apply(&self, scope: &Scope<'_>) -> Option<T>;
}

pub type Extract<T> = fn(&Captures<'_>, &Scope<'_>) -> Option<T>;

/// The common idiom: one regex plus a function turning its captures into a value.
pub struct Pattern<T> {
    name: &'static str,
    regex: Regex,
    extract: Extract<T>,
}

impl<T> Pattern<T> {
    /// Panics if `pattern` is not a valid regex. Patterns are fixed at build
    /// time and only constructed while initialising the chain statics.
    pub fn new(name: &'static str, pattern: &str, extract: Extract<T>) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            extract,
        }
    }
}

impl<T> Idiom<T> for Pattern<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, scope: &Scope<'_>) -> Option<T> {
        let caps = self.regex.captures(scope.text)?;
        (self.extract)(&caps, scope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<T> {
    pub idiom: &'static str,
    pub value: T,
}

pub struct IdiomChain<T> {
    field: &'static str,
    idioms: Vec<Box<dyn Idiom<T>>>,
}

impl<T: 'static> IdiomChain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            idioms: Vec::new(),
        }
    }

    /// Append an idiom at the lowest priority so far.
    pub fn with(mut self, idiom: impl Idiom<T> + 'static) -> Self {
        self.idioms.push(Box::new(idiom));
        self
    }

    pub fn pattern(self, name: &'static str, pattern: &str, extract: Extract<T>) -> Self {
        self.with(Pattern::new(name, pattern, extract))
    }

    pub fn first_match(&self, scope: &Scope<'_>) -> Option<Matched<T>> {
        self.idioms.iter().find_map(|idiom| {
            idiom.apply(scope).map(|value| Matched {
                idiom: idiom.name(),
                value,
            })
        })
    }

    /// Convenience for callers that only need the value.
    pub fn value(&self, scope: &Scope<'_>) -> Option<T> {
        self.first_match(scope).map(|m| m.value)
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.idioms.iter().map(|i| i.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.idioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idioms.is_empty()
    }
}

/// Capture group `i` parsed as an integer, `None` if absent or out of range.
pub(crate) fn cap<N: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<N> {
    caps.get(i)?.as_str().parse().ok()
}

/// Every chain in the order the extractor consults them, as
/// `(pass, field, idiom names)`.
pub fn catalog() -> Vec<(&'static str, &'static str, Vec<&'static str>)> {
    let mut out = vec![
        ("metadata", cut::CUT.field(), cut::CUT.names()),
        ("metadata", scalar::MOV.field(), scalar::MOV.names()),
        ("metadata", scalar::YADD.field(), scalar::YADD.names()),
        ("metadata", layer::LAYER.field(), layer::LAYER.names()),
        ("metadata", offset::OFFSET.field(), offset::OFFSET.names()),
        (
            "character",
            remap::CHARACTER_REMAP.field(),
            remap::CHARACTER_REMAP.names(),
        ),
        (
            "animated",
            remap::ANIMATED_REMAP.field(),
            remap::ANIMATED_REMAP.names(),
        ),
        ("variants", pulse::TICK_MASK.field(), pulse::TICK_MASK.names()),
        ("variants", pulse::COLOR_PULSE.field(), pulse::COLOR_PULSE.names()),
        ("variants", pulse::LIGHT_PULSE.field(), pulse::LIGHT_PULSE.names()),
        ("variants", color::PACKED.field(), color::PACKED.names()),
    ];
    for chain in color::CHANNELS.iter() {
        out.push(("variants", chain.field(), chain.names()));
    }
    out
}

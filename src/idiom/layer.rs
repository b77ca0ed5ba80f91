//! `_get_lay_sprite` return expressions: literals and named layer constants.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use super::{IdiomChain, cap};

/// Maps a symbolic constant in the source to its integer value.
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<i64>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantTable {
    values: BTreeMap<String, i64>,
}

impl Default for ConstantTable {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert("GND_LAY".to_string(), 100);
        values.insert("GME_LAY".to_string(), 110);
        values.insert("GME_LAY2".to_string(), 111);
        Self { values }
    }
}

impl ConstantTable {
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SymbolResolver for ConstantTable {
    fn resolve(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }
}

/// A recognised layer expression, before symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerExpr {
    Literal(i64),
    /// `NAME - minus`; `minus` is 0 for a bare constant.
    Symbol { name: String, minus: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownSymbol(String),
    /// `NAME - minus` does not fit in an i64.
    Overflow(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownSymbol(name) => write!(f, "unknown layer constant `{name}`"),
            ResolveError::Overflow(name) => write!(f, "layer constant `{name}` out of range"),
        }
    }
}

impl LayerExpr {
    pub fn resolve(&self, resolver: &dyn SymbolResolver) -> Result<i64, ResolveError> {
        match self {
            LayerExpr::Literal(v) => Ok(*v),
            LayerExpr::Symbol { name, minus } => {
                let base = resolver
                    .resolve(name)
                    .ok_or_else(|| ResolveError::UnknownSymbol(name.clone()))?;
                base.checked_sub(*minus)
                    .ok_or_else(|| ResolveError::Overflow(name.clone()))
            }
        }
    }
}

pub static LAYER: LazyLock<IdiomChain<LayerExpr>> = LazyLock::new(|| {
    IdiomChain::new("layer")
        .pattern("literal", r"^(-?\d+)$", |c, _| cap(c, 1).map(LayerExpr::Literal))
        .pattern(
            "constant-minus-literal",
            r"^([A-Za-z_]\w*)\s*-\s*(\d+)$",
            |c, _| {
                Some(LayerExpr::Symbol {
                    name: c[1].to_string(),
                    minus: cap(c, 2)?,
                })
            },
        )
        .pattern("constant", r"^([A-Za-z_]\w*)$", |c, _| {
            Some(LayerExpr::Symbol {
                name: c[1].to_string(),
                minus: 0,
            })
        })
});

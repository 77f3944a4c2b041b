//! Symbol interning.
//!
//! Symbols are interned by name in one process-wide table, so every symbol
//! named `"x"` shares a single allocation and a single operator descriptor.
//! The table is seeded with the standard operators before any user lookup,
//! which keeps `+`, `*` and friends from being shadowed by a tagless symbol.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::warn;

use crate::ops::{standard_operators, OperatorSpec};

static GLOBAL: Lazy<SymbolTable> = Lazy::new(|| {
    let table = SymbolTable::new();
    for (name, spec) in standard_operators() {
        table.intern(name, Some(spec));
    }
    table
});

struct SymbolData {
    name: Box<str>,
    spec: Option<OperatorSpec>,
}

/// An interned, named atom.
///
/// Two symbols with the same name compare and hash identically.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    /// The symbol's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The operator descriptor registered with this symbol, if any.
    #[must_use]
    pub fn spec(&self) -> Option<&OperatorSpec> {
        self.0.spec.as_ref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// A concurrent name → symbol table.
///
/// Lookups take a shared lock; insertion re-checks under the exclusive lock
/// so exactly one symbol wins per name.
pub struct SymbolTable {
    symbols: RwLock<HashMap<Box<str>, Symbol>>,
}

impl SymbolTable {
    fn new() -> Self {
        Self {
            symbols: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide table.
    #[must_use]
    pub fn global() -> &'static SymbolTable {
        &GLOBAL
    }

    /// Returns the symbol for `name`, creating it with `spec` if absent.
    ///
    /// The first registration of a name fixes its descriptor. A later call
    /// carrying a different descriptor gets the existing symbol back.
    pub fn intern(&self, name: &str, spec: Option<OperatorSpec>) -> Symbol {
        if let Some(existing) = self.symbols.read().get(name) {
            check_spec(existing, spec.as_ref());
            return existing.clone();
        }

        let mut symbols = self.symbols.write();
        if let Some(existing) = symbols.get(name) {
            check_spec(existing, spec.as_ref());
            return existing.clone();
        }

        let symbol = Symbol(Arc::new(SymbolData {
            name: name.into(),
            spec,
        }));
        symbols.insert(name.into(), symbol.clone());
        symbol
    }

    /// Looks up a symbol without creating it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.symbols.read().get(name).cloned()
    }

    /// Returns the number of interned symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    /// Returns true if no symbols have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }
}

fn check_spec(existing: &Symbol, requested: Option<&OperatorSpec>) {
    if let Some(requested) = requested {
        if existing.spec() != Some(requested) {
            warn!(
                symbol = existing.name(),
                "symbol already interned with a different operator spec; keeping the first"
            );
        }
    }
}

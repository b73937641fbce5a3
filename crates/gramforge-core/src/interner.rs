//! String interning for identifiers.
//!
//! Every name the front end sees (packages, grammars, non-terminals,
//! labels) is interned once when the syntax tree is built. Later phases
//! only compare `Symbol`s, which is an integer comparison.

use indexmap::IndexSet;

use crate::invariants::ensure_own_symbol;

/// A lightweight handle to an interned string.
///
/// Symbols are ordered by insertion order, not lexicographically.
/// Use [`Interner::resolve`] when string order matters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    /// Raw index, for dumps and debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// String interner backed by an insertion-ordered set.
///
/// The set position of a string is its symbol, so lookup in both
/// directions needs a single allocation per distinct string.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    strings: IndexSet<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing symbol when already present.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(index) = self.strings.get_index_of(s) {
            return Symbol(index as u32);
        }
        let (index, _) = self.strings.insert_full(s.into());
        Symbol(index as u32)
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.strings.get_index_of(s).map(|i| Symbol(i as u32))
    }

    /// Resolve a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was produced by another interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        ensure_own_symbol(self.strings.get_index(sym.index()), sym.0)
    }

    #[inline]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get_index(sym.index()).map(|s| &**s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all interned strings in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), &**s))
    }
}

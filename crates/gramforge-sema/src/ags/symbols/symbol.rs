use gramforge_core::{Symbol, WriteOnce};

use crate::ags::AgsId;
use crate::syntax::{NodeId, Span};
use crate::types::TypeId;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a label symbol came to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolOrigin {
    /// A label written on `node`.
    Original { node: AgsId },
    /// `source` seen through a quantifier or alternation: one value per
    /// repetition.
    Iterated { source: SymbolId },
    /// Same label bound in several alternatives.
    Union { branches: Vec<SymbolId> },
}

/// A label symbol with its type slots.
///
/// `expected` comes from a declared type, `deducted` from what the label
/// captures, and `actual` is the type consumers should use.
#[derive(Debug)]
pub struct AgsSymbol {
    label: Symbol,
    origin: SymbolOrigin,
    span: Span,
    declared: Option<NodeId>,
    pub(crate) expected: WriteOnce<TypeId>,
    pub(crate) deducted: WriteOnce<TypeId>,
    pub(crate) actual: WriteOnce<TypeId>,
}

impl AgsSymbol {
    pub fn label(&self) -> Symbol {
        self.label
    }

    pub fn origin(&self) -> &SymbolOrigin {
        &self.origin
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Type expression written on the label.
    pub fn declared(&self) -> Option<NodeId> {
        self.declared
    }

    pub fn is_iterated(&self) -> bool {
        matches!(self.origin, SymbolOrigin::Iterated { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self.origin, SymbolOrigin::Union { .. })
    }

    pub fn expected(&self) -> Option<TypeId> {
        self.expected.copied()
    }

    pub fn deducted(&self) -> Option<TypeId> {
        self.deducted.copied()
    }

    pub fn actual(&self) -> Option<TypeId> {
        self.actual.copied()
    }
}

/// Storage for every label symbol of one analysis run.
///
/// Symbols are only ever derived from symbols allocated before them, so
/// arena order is a valid evaluation order.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<AgsSymbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, label: Symbol, origin: SymbolOrigin, span: Span, declared: Option<NodeId>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(AgsSymbol {
            label,
            origin,
            span,
            declared,
            expected: WriteOnce::new(),
            deducted: WriteOnce::new(),
            actual: WriteOnce::new(),
        });
        id
    }

    pub(crate) fn alloc_original(
        &mut self,
        label: Symbol,
        node: AgsId,
        span: Span,
        declared: Option<NodeId>,
    ) -> SymbolId {
        self.push(label, SymbolOrigin::Original { node }, span, declared)
    }

    pub(crate) fn alloc_iterated(&mut self, source: SymbolId) -> SymbolId {
        let (label, span) = {
            let src = self.get(source);
            (src.label, src.span)
        };
        self.push(label, SymbolOrigin::Iterated { source }, span, None)
    }

    pub(crate) fn alloc_union(&mut self, label: Symbol, branches: Vec<SymbolId>) -> SymbolId {
        let span = branches
            .first()
            .map(|&b| self.get(b).span)
            .unwrap_or_default();
        self.push(label, SymbolOrigin::Union { branches }, span, None)
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> &AgsSymbol {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &AgsSymbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Follow iterated symbols down to the symbol they repeat.
    pub fn base(&self, id: SymbolId) -> SymbolId {
        let mut cur = id;
        while let SymbolOrigin::Iterated { source } = self.get(cur).origin {
            cur = source;
        }
        cur
    }

    /// Iteration depth: 0 for a plain label, 2 for `((x:A)*)*`.
    pub fn iteration_depth(&self, id: SymbolId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let SymbolOrigin::Iterated { source } = self.get(cur).origin {
            depth += 1;
            cur = source;
        }
        depth
    }
}

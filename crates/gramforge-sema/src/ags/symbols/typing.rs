use std::sync::Arc;

use gramforge_core::Symbol;

use crate::ags::{AgsArena, AgsId, Atom, Decoration};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::namespace::NamespaceTree;
use crate::syntax::{NodeId, SyntaxTree};
use crate::types::{Lattice, TYPE_NONE, TypeId};

use super::symbol::{SymbolArena, SymbolId, SymbolOrigin};

/// Fill the expected, deducted and actual type of every symbol.
///
/// Symbols are visited in allocation order, so the sources of an iterated
/// or union symbol are typed before it.
#[tracing::instrument(skip_all, fields(symbols = symbols.len()))]
pub fn type_symbols(
    symbols: &SymbolArena,
    arena: &AgsArena,
    tree: &SyntaxTree,
    names: &NamespaceTree,
    lattice: &mut Lattice<'_>,
    diag: &Diagnostics,
) {
    let mut typer = Typer {
        symbols,
        arena,
        tree,
        names,
        lattice,
        diag,
    };
    for (id, _) in symbols.iter() {
        typer.type_symbol(id);
    }
}

struct Typer<'a, 'l> {
    symbols: &'a SymbolArena,
    arena: &'a AgsArena,
    tree: &'a SyntaxTree,
    names: &'a NamespaceTree,
    lattice: &'a mut Lattice<'l>,
    diag: &'a Diagnostics,
}

impl Typer<'_, '_> {
    fn type_symbol(&mut self, id: SymbolId) {
        let symbols = self.symbols;
        let symbol = symbols.get(id);

        let expected = symbol
            .declared()
            .and_then(|expr| self.tree.node(expr).ty());
        if let Some(expected) = expected {
            symbol.expected.set(expected);
        }

        let deducted = match symbol.origin() {
            SymbolOrigin::Original { node } => self.deduce_original(*node, symbol.label()),
            SymbolOrigin::Iterated { source } => {
                let element = self.actual_of(*source);
                let interner = self.tree.interner();
                self.lattice.table_mut().array(element, interner)
            }
            SymbolOrigin::Union { branches } => self.deduce_union(id, branches),
        };
        symbol.deducted.set(deducted);

        let actual = match expected {
            Some(expected) => {
                if !deducted.is_none() && !self.lattice.assignable_from(expected, deducted) {
                    let table = self.lattice.table();
                    self.diag
                        .report(DiagnosticKind::TypeMismatch, symbol.span())
                        .file(self.file_of(id))
                        .arg(self.tree.text(symbol.label()))
                        .arg(table.render(expected))
                        .arg(table.render(deducted))
                        .emit();
                }
                expected
            }
            None => deducted,
        };
        symbol.actual.set(actual);
    }

    /// Type captured by a label written on `node`. Quantifiers applied
    /// before the label make it a list.
    fn deduce_original(&mut self, node: AgsId, label: Symbol) -> TypeId {
        let arena = self.arena;
        let ags = arena.node(node);
        let base = match ags.atom() {
            Some(Atom::Reference { node: reference }) => self.referenced_type(*reference),
            _ => TYPE_NONE,
        };

        let wrap = ags
            .decorations()
            .iter()
            .take_while(|d| !matches!(d, Decoration::Label { name, .. } if *name == label))
            .filter(|d| matches!(d, Decoration::Quantifier(_)))
            .count();
        let interner = self.tree.interner();
        (0..wrap).fold(base, |ty, _| self.lattice.table_mut().array(ty, interner))
    }

    /// LUB of the declared types of every non-terminal a reference
    /// resolved to. Untyped non-terminals contribute nothing.
    fn referenced_type(&mut self, reference: NodeId) -> TypeId {
        let tree = self.tree;
        let Some(resolution) = tree.node(reference).referenced() else {
            return TYPE_NONE;
        };
        let declared: Vec<TypeId> = resolution
            .nodes
            .iter()
            .flat_map(|&ns| self.names.decl_sites(ns))
            .filter_map(|site| tree.node(site.node).ty())
            .collect();
        self.lattice.lub_all(declared).unwrap_or(TYPE_NONE)
    }

    fn deduce_union(&mut self, id: SymbolId, branches: &[SymbolId]) -> TypeId {
        let mut acc: Option<TypeId> = None;
        for &branch in branches {
            let ty = self.actual_of(branch);
            let Some(prev) = acc else {
                acc = Some(ty);
                continue;
            };
            let lub = self.lattice.lub(prev, ty);
            if lub.is_none() && !prev.is_none() && !ty.is_none() {
                let symbol = self.symbols.get(id);
                let table = self.lattice.table();
                self.diag
                    .report(DiagnosticKind::LubConflict, symbol.span())
                    .file(self.file_of(id))
                    .arg(self.tree.text(symbol.label()))
                    .arg(table.render(prev))
                    .arg(table.render(ty))
                    .emit();
                return TYPE_NONE;
            }
            acc = Some(lub);
        }
        acc.unwrap_or(TYPE_NONE)
    }

    fn actual_of(&self, id: SymbolId) -> TypeId {
        self.symbols.get(id).actual().unwrap_or(TYPE_NONE)
    }

    /// File of the label occurrence a symbol ultimately stems from.
    fn file_of(&self, id: SymbolId) -> Option<Arc<str>> {
        let mut cur = id;
        loop {
            match self.symbols.get(cur).origin() {
                SymbolOrigin::Original { node } => {
                    return self.tree.file_name(self.arena.node(*node).origin());
                }
                SymbolOrigin::Iterated { source } => cur = *source,
                SymbolOrigin::Union { branches } => cur = *branches.first()?,
            }
        }
    }
}

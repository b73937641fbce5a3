//! Abstract grammar specification (AGS).
//!
//! Non-terminal bodies are lowered into a graph of `UNION`, `CONCAT` and
//! `ITEM` nodes. Nested lists of the same kind are flattened by relinking
//! sibling lists in place, and single-element lists collapse into their
//! element.
//!
//! Every non-terminal declaration site set (one namespace node) is built
//! once as a *member*. A grammar sees a non-terminal as the ordered list of
//! members contributed by itself and its ancestors ([`NontermGraph`]), so
//! two grammars extending the same base share the base member without
//! aliasing each other's lists.

mod arena;
mod build;
pub mod dump;
mod graph;
mod invariants;
mod node;
pub mod symbols;

#[cfg(test)]
mod arena_tests;

use std::cmp::Reverse;

use gramforge_core::Symbol;
use indexmap::IndexMap;

pub use arena::{AgsArena, Children, IterAs};
pub use build::AgsBuilder;
pub use graph::NontermGraph;
pub use node::{ActionKind, AgsId, AgsKind, AgsNode, Atom, Decoration};

use crate::Result;
use crate::analyze::Context;
use crate::analyze::extends::InheritanceGraph;
use crate::diagnostics::DiagnosticKind;
use crate::namespace::{NsId, NsKind};
use crate::syntax::{NodeId, NodeKind};
use crate::types::{Lattice, TypeId};
use symbols::{SymbolArena, SymbolMap};

/// One non-terminal as seen from one grammar.
#[derive(Debug, Clone)]
pub struct NontermSpec {
    pub name: Symbol,
    pub graph: NontermGraph,
    /// Namespace node of each member, in the same order as the graph.
    pub members: Vec<NsId>,
    /// Labels the non-terminal exposes.
    pub symbols: SymbolMap,
    /// LUB of the declared types of all members.
    pub ty: Option<TypeId>,
}

/// Everything a code generator needs for one grammar.
#[derive(Debug, Clone)]
pub struct GrammarSpec {
    pub grammar: NsId,
    pub name: Symbol,
    pub nonterminals: IndexMap<Symbol, NontermSpec>,
}

impl GrammarSpec {
    pub fn nonterminal(&self, name: Symbol) -> Option<&NontermSpec> {
        self.nonterminals.get(&name)
    }
}

/// One built member: the graph of a non-terminal namespace node and the
/// labels it exposes on its own.
#[derive(Debug, Clone)]
pub struct Member {
    pub root: AgsId,
    pub symbols: SymbolMap,
}

/// Output of [`build_grammars`].
#[derive(Debug, Default)]
pub struct GrammarSet {
    arena: AgsArena,
    symbols: SymbolArena,
    members: IndexMap<NsId, Member>,
    grammars: Vec<GrammarSpec>,
}

impl GrammarSet {
    pub fn arena(&self) -> &AgsArena {
        &self.arena
    }

    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    pub fn member(&self, ns: NsId) -> Option<&Member> {
        self.members.get(&ns)
    }

    pub fn members(&self) -> impl Iterator<Item = (NsId, &Member)> {
        self.members.iter().map(|(ns, m)| (*ns, m))
    }

    pub fn grammars(&self) -> &[GrammarSpec] {
        &self.grammars
    }

    pub fn grammar(&self, ns: NsId) -> Option<&GrammarSpec> {
        self.grammars.iter().find(|g| g.grammar == ns)
    }
}

/// Build every non-terminal member, then assemble the view of each
/// grammar and type every label.
#[tracing::instrument(skip_all)]
pub fn build_grammars(
    ctx: &Context<'_>,
    grammars: &InheritanceGraph,
    lattice: &mut Lattice<'_>,
    fuel: u32,
) -> Result<GrammarSet> {
    let tree = ctx.tree;
    let mut set = GrammarSet::default();

    let mut decls: IndexMap<NsId, Vec<NodeId>> = IndexMap::new();
    for node in tree.nodes_where(|k| matches!(k, NodeKind::Nonterminal { .. })) {
        if let Some(ns) = tree.node(node).declared() {
            decls.entry(ns).or_default().push(node);
        }
    }

    for (ns, sites) in &decls {
        let bodies: Vec<NodeId> = sites
            .iter()
            .filter_map(|&decl| tree.nonterm_body(decl))
            .collect();
        let root = AgsBuilder::new(tree, &mut set.arena, ctx.diag, fuel)
            .build_nonterminal_member(sites[0], &bodies)?;
        let symbols =
            symbols::collect_member_symbols(&set.arena, &mut set.symbols, tree, ctx.diag, root);
        set.members.insert(*ns, Member { root, symbols });
    }
    tracing::debug!(
        members = set.members.len(),
        nodes = set.arena.len(),
        "members built"
    );

    for node in tree.nodes_where(|k| matches!(k, NodeKind::Grammar { .. })) {
        let (Some(grammar), Some(scope)) = (tree.node(node).declared(), tree.node(node).scope())
        else {
            continue;
        };
        let Some(name) = ctx.names.name(grammar) else {
            continue;
        };
        let lineage = grammars.lineage(grammar);
        let rank = |ns: NsId| {
            ctx.names
                .parent(ns)
                .and_then(|owner| lineage.iter().position(|&g| g == owner))
                .unwrap_or(lineage.len())
        };

        let mut nonterminals = IndexMap::new();
        let table = ctx.scopes.scope(scope).table();
        for (label, mut members) in table.entries_of_kind(NsKind::Nonterminal) {
            members.retain(|ns| set.members.contains_key(ns));
            if members.is_empty() {
                continue;
            }
            members.sort_by_key(|&ns| Reverse(rank(ns)));
            let spec = assemble(ctx, &mut set, lattice, grammar, label, members);
            nonterminals.insert(label, spec);
        }
        set.grammars.push(GrammarSpec {
            grammar,
            name,
            nonterminals,
        });
    }

    symbols::type_symbols(&set.symbols, &set.arena, tree, ctx.names, lattice, ctx.diag);
    tracing::debug!(
        grammars = set.grammars.len(),
        symbols = set.symbols.len(),
        "grammars assembled"
    );
    Ok(set)
}

fn assemble(
    ctx: &Context<'_>,
    set: &mut GrammarSet,
    lattice: &mut Lattice<'_>,
    grammar: NsId,
    name: Symbol,
    members: Vec<NsId>,
) -> NontermSpec {
    let tree = ctx.tree;
    let roots: Vec<AgsId> = members.iter().map(|ns| set.members[ns].root).collect();
    let maps: Vec<SymbolMap> = members
        .iter()
        .map(|ns| set.members[ns].symbols.clone())
        .collect();
    let graph = NontermGraph::from_members(roots);

    let own = members
        .last()
        .is_some_and(|&ns| ctx.names.parent(ns) == Some(grammar));
    if own
        && graph.is_empty_language(&set.arena)
        && let Some(site) = members.last().and_then(|&ns| ctx.names.first_site(ns))
    {
        ctx.diag
            .report(DiagnosticKind::EmptyNonterminal, site.span)
            .file(site.file)
            .arg(tree.text(name))
            .emit();
    }

    let declared: Vec<TypeId> = members
        .iter()
        .flat_map(|&ns| ctx.names.decl_sites(ns))
        .filter_map(|site| tree.node(site.node).ty())
        .collect();

    NontermSpec {
        name,
        graph,
        symbols: symbols::merge_members(&mut set.symbols, &maps),
        members,
        ty: lattice.lub_all(declared),
    }
}

//! Inheritance relations between grammars and between classes.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::diagnostics::DiagnosticKind;
use crate::namespace::{NsId, NsKind};
use crate::syntax::{NodeId, Span};

use super::Context;

/// Direct parents of every declaration of one kind.
///
/// Built from the resolved `extends` clauses; clauses that did not
/// resolve contribute no edge.
#[derive(Debug, Clone)]
pub struct InheritanceGraph {
    kind: NsKind,
    parents: IndexMap<NsId, Vec<NsId>>,
}

impl InheritanceGraph {
    pub fn collect(ctx: &Context<'_>, kind: NsKind) -> Self {
        let mut parents: IndexMap<NsId, Vec<NsId>> = IndexMap::new();
        let decls = ctx
            .tree
            .nodes_where(move |k| k.ns_kind() == Some(kind));

        for decl in decls {
            let Some(ns) = ctx.tree.node(decl).declared() else {
                continue;
            };
            let edges = parents.entry(ns).or_default();
            for clause in ctx.tree.extends_clauses(decl) {
                let target = ctx
                    .tree
                    .node(clause)
                    .referenced()
                    .filter(|r| r.kind == kind)
                    .and_then(|r| r.single());
                if let Some(target) = target
                    && !edges.contains(&target)
                {
                    edges.push(target);
                }
            }
        }

        Self { kind, parents }
    }

    pub fn kind(&self) -> NsKind {
        self.kind
    }

    pub fn nodes(&self) -> impl Iterator<Item = NsId> + '_ {
        self.parents.keys().copied()
    }

    pub fn parents(&self, ns: NsId) -> &[NsId] {
        self.parents.get(&ns).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transitive parents, nearest first. Terminates on cycles and never
    /// includes `ns` itself.
    pub fn ancestors(&self, ns: NsId) -> Vec<NsId> {
        let mut seen = IndexSet::from([ns]);
        let mut queue: VecDeque<NsId> = self.parents(ns).iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if seen.insert(next) {
                queue.extend(self.parents(next).iter().copied());
            }
        }
        seen.shift_remove_index(0);
        seen.into_iter().collect()
    }

    /// `ns` followed by its ancestors.
    pub fn lineage(&self, ns: NsId) -> Vec<NsId> {
        let mut out = vec![ns];
        out.extend(self.ancestors(ns));
        out
    }

    /// Whether following parents from `ns` leads back to `ns`.
    pub fn reaches_itself(&self, ns: NsId) -> bool {
        let mut visited = IndexSet::new();
        let mut stack: Vec<NsId> = self.parents(ns).to_vec();
        while let Some(next) = stack.pop() {
            if next == ns {
                return true;
            }
            if visited.insert(next) {
                stack.extend_from_slice(self.parents(next));
            }
        }
        false
    }
}

/// Declarations that take part in an inheritance cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    cyclic: IndexSet<NsId>,
}

impl CycleReport {
    pub fn contains(&self, ns: NsId) -> bool {
        self.cyclic.contains(&ns)
    }

    pub fn iter(&self) -> impl Iterator<Item = NsId> + '_ {
        self.cyclic.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cyclic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cyclic.is_empty()
    }
}

/// Report every declaration that reaches itself through `extends`.
///
/// A declaration that merely reaches a cycle without being on it is not
/// reported.
#[tracing::instrument(skip_all)]
pub fn check_cycles(ctx: &Context<'_>, graphs: &[&InheritanceGraph]) -> CycleReport {
    let mut report = CycleReport::default();
    let interner = ctx.tree.interner();

    for graph in graphs {
        for ns in graph.nodes() {
            if !graph.reaches_itself(ns) || !report.cyclic.insert(ns) {
                continue;
            }
            let Some(site) = ctx.names.first_site(ns) else {
                continue;
            };
            let span = extends_span(ctx, site.node).unwrap_or(site.span);
            ctx.diag
                .report(DiagnosticKind::CyclicInheritance, span)
                .file(site.file)
                .arg(graph.kind())
                .arg(ctx.names.qualified_name(ns, interner))
                .emit();
        }
    }

    tracing::debug!(cyclic = report.len(), "inheritance checked");
    report
}

fn extends_span(ctx: &Context<'_>, decl: NodeId) -> Option<Span> {
    let clause = ctx.tree.extends_clauses(decl).next()?;
    Some(ctx.tree.span(clause))
}

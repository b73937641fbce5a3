//! Non-terminal references in grammar bodies.

use crate::namespace::{KindSet, NsKind};
use crate::scope::ResolveMode;
use crate::syntax::NodeKind;

use super::Context;
use super::invariants::ensure_scope;

/// Resolve every non-terminal reference from its own scope and record the
/// result in the reference's slot.
#[tracing::instrument(skip_all)]
pub fn resolve_references(ctx: &Context<'_>) {
    let resolver = ctx.resolver();
    let path_kinds = KindSet::of(&[NsKind::Package, NsKind::Grammar]);
    let mut resolved = 0usize;

    let refs = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::NontermRef { .. }));
    for reference in refs {
        let NodeKind::NontermRef { path } = ctx.tree.kind(reference) else {
            continue;
        };
        let scope = ensure_scope(ctx.tree, reference);
        if let Some(resolution) = resolver.resolve(
            reference,
            scope,
            path,
            path_kinds,
            NsKind::Nonterminal.into(),
            ResolveMode::Reporting,
        ) {
            ctx.tree.node(reference).set_referenced(resolution);
            resolved += 1;
        }
    }

    tracing::debug!(resolved, "references resolved");
}

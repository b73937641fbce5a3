//! Scope construction and declaration collection.

use std::thread;

use crate::namespace::{NsId, NsKind};
use crate::scope::{ScopeId, ScopeTree};
use crate::syntax::{NodeId, NodeKind, Segment, SyntaxTree};

use super::Context;
use super::invariants::ensure_scope;

/// Create the scope tree and fill every node's scope slot.
///
/// Files, packages, grammars and classes open a scope; every other node
/// belongs to the nearest enclosing one.
#[tracing::instrument(skip_all, fields(files = tree.files().len()))]
pub fn build_scopes(tree: &SyntaxTree) -> ScopeTree {
    let mut scopes = ScopeTree::new();
    let global = scopes.global();
    let mut stack: Vec<(NodeId, ScopeId)> =
        tree.files().iter().rev().map(|&f| (f, global)).collect();

    while let Some((id, enclosing)) = stack.pop() {
        let node = tree.node(id);
        let scope = if node.kind().owns_scope() {
            scopes.push(enclosing, id)
        } else {
            enclosing
        };
        node.set_scope(scope);
        stack.extend(node.children().iter().rev().map(|&c| (c, scope)));
    }

    tracing::debug!(scopes = scopes.len(), "scopes built");
    scopes
}

/// Record every declaration in the namespace tree and bind it locally in
/// its enclosing scope.
///
/// With `parallel`, files are processed on scoped threads. The resulting
/// namespace structure is the same either way; only handle numbering and
/// the order of declaration sites may differ.
#[tracing::instrument(skip_all, fields(files = ctx.tree.files().len(), parallel = parallel))]
pub fn collect_declarations(ctx: &Context<'_>, parallel: bool) {
    let files = ctx.tree.files();
    if parallel && files.len() > 1 {
        thread::scope(|s| {
            for &file in files {
                s.spawn(move || collect_file(ctx, file));
            }
        });
    } else {
        for &file in files {
            collect_file(ctx, file);
        }
    }
    tracing::debug!(nodes = ctx.names.len(), "declarations collected");
}

fn collect_file(ctx: &Context<'_>, file: NodeId) {
    let file_scope = ensure_scope(ctx.tree, file);
    let mut package = ctx.names.root();

    if let Some(clause) = ctx.tree.package_clause(file)
        && let NodeKind::PackageClause { path } = ctx.tree.kind(clause)
    {
        for segment in path.names() {
            if let Segment::Name(name) = segment {
                package =
                    ctx.names
                        .declare_child(package, *name, NsKind::Package, ctx.site(clause));
            }
        }
    }

    ctx.scopes.bind_namespace(file_scope, package);
    collect_members(ctx, file, package);
}

fn collect_members(ctx: &Context<'_>, container: NodeId, parent: NsId) {
    for &child in ctx.tree.children(container) {
        let kind = ctx.tree.kind(child);
        let (Some(ns_kind), Some(name)) = (kind.ns_kind(), kind.declared_name()) else {
            continue;
        };

        let ns = ctx.names.declare_child(parent, name, ns_kind, ctx.site(child));
        ctx.tree.node(child).set_declared(ns);

        let scope = ensure_scope(ctx.tree, child);
        if !kind.owns_scope() {
            ctx.scopes.declare_local(scope, name, ns_kind, ns);
            continue;
        }

        if let Some(enclosing) = ctx.scopes.parent(scope) {
            ctx.scopes.declare_local(enclosing, name, ns_kind, ns);
        }
        ctx.scopes.bind_namespace(scope, ns);
        collect_members(ctx, child, ns);
    }
}

//! Import phase: fills scopes with bindings that are not local.
//!
//! Order matters, since a later import into a sealed-kind binding
//! replaces an earlier one:
//!
//! 1. the global scope imports every child of the namespace root;
//! 2. each file scope imports every child of its own package;
//! 3. explicit `import` statements, in source order;
//! 4. `extends` clauses resolve in the scope enclosing their declaration;
//! 5. grammar scopes import the children of their ancestor grammars.

use crate::diagnostics::DiagnosticKind;
use crate::namespace::{KindSet, NsKind};
use crate::scope::ResolveMode;
use crate::syntax::NodeKind;

use super::Context;
use super::extends::InheritanceGraph;
use super::invariants::ensure_scope;

/// Run every import step and return the resolved grammar inheritance graph.
#[tracing::instrument(skip_all)]
pub fn resolve_imports(ctx: &Context<'_>) -> InheritanceGraph {
    import_globals(ctx);
    import_packages(ctx);
    resolve_explicit_imports(ctx);
    resolve_extends(ctx);
    let grammars = InheritanceGraph::collect(ctx, NsKind::Grammar);
    import_ancestors(ctx, &grammars);
    grammars
}

pub fn import_globals(ctx: &Context<'_>) {
    ctx.scopes
        .import_all(ctx.scopes.global(), ctx.names, ctx.names.root(), None);
}

pub fn import_packages(ctx: &Context<'_>) {
    for &file in ctx.tree.files() {
        let scope = ensure_scope(ctx.tree, file);
        if let Some(package) = ctx.scopes.scope(scope).namespace() {
            ctx.scopes.import_all(scope, ctx.names, package, None);
        }
    }
}

/// Resolve `import` statements from the outermost scope and bind their
/// targets in the importing file's scope.
pub fn resolve_explicit_imports(ctx: &Context<'_>) {
    let resolver = ctx.resolver();
    for &file in ctx.tree.files() {
        let scope = ensure_scope(ctx.tree, file);
        for &child in ctx.tree.children(file) {
            let NodeKind::Import {
                path,
                wildcard,
                alias,
            } = ctx.tree.kind(child)
            else {
                continue;
            };

            let target = if *wildcard {
                KindSet::of(&[NsKind::Package, NsKind::Grammar])
            } else {
                KindSet::CONTAINERS
            };
            let Some(resolution) = resolver.resolve(
                child,
                ctx.scopes.global(),
                path,
                KindSet::CONTAINERS,
                target,
                ResolveMode::Reporting,
            ) else {
                continue;
            };

            for &ns in &resolution.nodes {
                if *wildcard {
                    ctx.scopes.import_all(scope, ctx.names, ns, Some(child));
                } else {
                    ctx.scopes
                        .import_one(scope, ctx.names, ns, *alias, Some(child));
                }
            }
            ctx.tree.node(child).set_referenced(resolution);
        }
    }
}

/// Resolve every `extends` clause in the scope enclosing its declaration.
pub fn resolve_extends(ctx: &Context<'_>) {
    let resolver = ctx.resolver();
    let clauses = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::Extends { .. }));

    for clause in clauses {
        let NodeKind::Extends { path } = ctx.tree.kind(clause) else {
            continue;
        };
        let Some(owner) = ctx.tree.parent(clause) else {
            continue;
        };
        let Some(kind) = ctx.tree.kind(owner).ns_kind() else {
            continue;
        };
        let owner_scope = ensure_scope(ctx.tree, owner);
        let from = ctx.scopes.parent(owner_scope).unwrap_or(owner_scope);

        if let Some(resolution) = resolver.resolve(
            clause,
            from,
            path,
            KindSet::CONTAINERS,
            kind.into(),
            ResolveMode::Reporting,
        ) {
            ctx.tree.node(clause).set_referenced(resolution);
        }
    }
}

/// Import the children of every ancestor grammar into each grammar scope.
///
/// Ancestors are gathered nearest-first and applied farthest-first, so
/// that for sealed kinds the nearest ancestor's binding is the one left.
pub fn import_ancestors(ctx: &Context<'_>, grammars: &InheritanceGraph) {
    let decls = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::Grammar { .. }));

    for decl in decls {
        let Some(ns) = ctx.tree.node(decl).declared() else {
            continue;
        };
        let scope = ensure_scope(ctx.tree, decl);
        for ancestor in grammars.ancestors(ns).into_iter().rev() {
            ctx.scopes.import_all(scope, ctx.names, ancestor, None);
        }
    }
}

/// Warn about explicit imports no reporting lookup went through.
#[tracing::instrument(skip_all)]
pub fn report_unused_imports(ctx: &Context<'_>) {
    let interner = ctx.tree.interner();
    let imports = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::Import { .. }));

    for import in imports {
        let node = ctx.tree.node(import);
        if node.referenced().is_none() || ctx.scopes.is_import_used(import) {
            continue;
        }
        let NodeKind::Import { path, wildcard, .. } = node.kind() else {
            continue;
        };
        let mut text = path.render(interner);
        if *wildcard {
            text.push_str(".*");
        }
        ctx.diag
            .report(DiagnosticKind::UnusedImport, node.span())
            .file(ctx.tree.file_name(import))
            .arg(text)
            .emit();
    }
}

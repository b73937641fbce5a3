//! Structural checks over the finished namespace tree.

use gramforge_core::Symbol;

use crate::diagnostics::DiagnosticKind;
use crate::namespace::{KindBuckets, NsId, NsKind};

use super::Context;

/// Report children a node may not contain, duplicate sealed declarations
/// and names declared with clashing kinds.
///
/// Each problem is reported once: a duplicate lists all of its sites, and
/// a clash is reported per pair of kinds.
#[tracing::instrument(skip_all)]
pub fn validate_namespace(ctx: &Context<'_>) {
    let mut stack = vec![ctx.names.root()];
    while let Some(parent) = stack.pop() {
        let children = ctx.names.children_snapshot(parent);
        for (name, buckets) in children.iter() {
            check_containment(ctx, parent, buckets);
            check_duplicates(ctx, buckets);
            check_clashes(ctx, *name, buckets);
            stack.extend(buckets.values().flatten().copied());
        }
    }
}

fn check_containment(ctx: &Context<'_>, parent: NsId, buckets: &KindBuckets) {
    let parent_kind = ctx.names.kind(parent);
    let interner = ctx.tree.interner();
    for (&kind, ids) in buckets {
        if parent_kind.can_contain(kind) {
            continue;
        }
        for &id in ids {
            let name = ctx.names.qualified_name(id, interner);
            for site in ctx.names.decl_sites(id) {
                ctx.diag
                    .report(DiagnosticKind::CannotContain, site.span)
                    .file(site.file)
                    .arg(parent_kind)
                    .arg(ctx.names.qualified_name(parent, interner))
                    .arg(kind)
                    .arg(&name)
                    .emit();
            }
        }
    }
}

fn check_duplicates(ctx: &Context<'_>, buckets: &KindBuckets) {
    let interner = ctx.tree.interner();
    for (&kind, ids) in buckets {
        if kind.is_open() || ids.len() < 2 {
            continue;
        }
        let sites: Vec<_> = ids.iter().flat_map(|&id| ctx.names.decl_sites(id)).collect();
        let Some((first, rest)) = sites.split_first() else {
            continue;
        };
        let mut builder = ctx
            .diag
            .report(DiagnosticKind::DuplicateDeclaration, first.span)
            .file(first.file.clone())
            .arg(kind)
            .arg(ctx.names.qualified_name(ids[0], interner))
            .arg(ids.len());
        for other in rest {
            builder = builder.related_to("also declared here", other.file.clone(), other.span);
        }
        builder.emit();
    }
}

fn check_clashes(ctx: &Context<'_>, name: Symbol, buckets: &KindBuckets) {
    let kinds: Vec<(NsKind, NsId)> = buckets
        .iter()
        .filter_map(|(&kind, ids)| ids.first().map(|&id| (kind, id)))
        .collect();

    for (i, &(first_kind, first_id)) in kinds.iter().enumerate() {
        for &(second_kind, second_id) in &kinds[i + 1..] {
            if !first_kind.clashes_with(second_kind) {
                continue;
            }
            let (Some(at), Some(prior)) = (
                ctx.names.first_site(second_id),
                ctx.names.first_site(first_id),
            ) else {
                continue;
            };
            ctx.diag
                .report(DiagnosticKind::KindClash, at.span)
                .file(at.file)
                .arg(ctx.tree.text(name))
                .arg(first_kind)
                .arg(second_kind)
                .related_to(format!("declared as {first_kind} here"), prior.file, prior.span)
                .emit();
        }
    }
}

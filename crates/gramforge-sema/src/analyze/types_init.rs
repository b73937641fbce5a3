//! Type initialization: class types and declared type expressions.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::namespace::{KindSet, NsId, NsKind};
use crate::scope::{ResolveMode, Resolver};
use crate::syntax::{NodeId, NodeKind, Path};
use crate::types::{HostResolver, TYPE_NONE, TypeId, TypeShape, TypeTable};

use super::Context;
use super::extends::{CycleReport, InheritanceGraph};
use super::invariants::ensure_scope;

/// Assign a nominal type to every class and evaluate every type
/// expression attached to a non-terminal or a label.
#[tracing::instrument(skip_all)]
pub fn init_types(
    ctx: &Context<'_>,
    table: &mut TypeTable,
    host: &dyn HostResolver,
    classes: &InheritanceGraph,
    cycles: &CycleReport,
) {
    let mut init = TypeInit {
        ctx,
        resolver: ctx.resolver(),
        table,
        host,
        classes,
        cycles,
        nominal: IndexMap::new(),
    };

    let class_decls: Vec<NodeId> = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::Class { .. }))
        .collect();
    for decl in class_decls {
        if let Some(ns) = ctx.tree.node(decl).declared() {
            let ty = init.nominal_for(ns);
            ctx.tree.node(decl).set_ty(ty);
        }
    }

    let typed: Vec<NodeId> = ctx
        .tree
        .nodes_where(|k| matches!(k, NodeKind::Nonterminal { .. } | NodeKind::Item { .. }))
        .collect();
    for node in typed {
        match ctx.tree.kind(node) {
            NodeKind::Nonterminal { .. } => {
                if let Some(expr) = ctx.tree.declared_type_expr(node) {
                    let ty = init.eval(expr);
                    ctx.tree.node(node).set_ty(ty);
                }
            }
            _ => {
                if let Some(expr) = ctx.tree.item_label_type(node) {
                    init.eval(expr);
                }
            }
        }
    }

    tracing::debug!(types = init.table.len(), "types initialized");
}

struct TypeInit<'a, 'c> {
    ctx: &'c Context<'a>,
    resolver: Resolver<'a>,
    table: &'c mut TypeTable,
    host: &'c dyn HostResolver,
    classes: &'c InheritanceGraph,
    cycles: &'c CycleReport,
    nominal: IndexMap<NsId, TypeId>,
}

impl TypeInit<'_, '_> {
    /// Nominal type of a class. The parent link is kept only for classes
    /// outside inheritance cycles.
    fn nominal_for(&mut self, ns: NsId) -> TypeId {
        if let Some(&ty) = self.nominal.get(&ns) {
            return ty;
        }
        let Some(name) = self.ctx.names.name(ns) else {
            return TYPE_NONE;
        };
        let parent = match self.classes.parents(ns).first().copied() {
            Some(p) if !self.cycles.contains(ns) => Some(self.nominal_for(p)),
            _ => None,
        };
        let tree = self.ctx.tree;
        let ty = self.table.intern(
            TypeShape::Nominal {
                name,
                decl: ns,
                parent,
            },
            tree.interner(),
        );
        self.nominal.insert(ns, ty);
        ty
    }

    fn eval(&mut self, expr: NodeId) -> TypeId {
        let tree = self.ctx.tree;
        let ty = match tree.kind(expr) {
            NodeKind::TypeName { path } => self.eval_name(expr, path),
            NodeKind::ArrayType => {
                let element = match tree.children(expr).first() {
                    Some(&child) => self.eval(child),
                    None => TYPE_NONE,
                };
                self.table.array(element, tree.interner())
            }
            NodeKind::ObjectType { fields } => {
                let mut map = BTreeMap::new();
                for (&field, &child) in fields.iter().zip(tree.children(expr)) {
                    let ty = self.eval(child);
                    map.insert(field, ty);
                }
                self.table.object(map, tree.interner())
            }
            _ => TYPE_NONE,
        };
        tree.node(expr).set_ty(ty);
        ty
    }

    /// Local class first, then the host, then a reporting lookup so the
    /// failure is diagnosed.
    fn eval_name(&mut self, expr: NodeId, path: &Path) -> TypeId {
        let tree = self.ctx.tree;
        if self.lookup_class(expr, path, ResolveMode::Speculative).is_some() {
            // A successful lookup never emits; reporting mode records the
            // imports it read.
            if let Some(ns) = self.lookup_class(expr, path, ResolveMode::Reporting) {
                return self.nominal_for(ns);
            }
        }

        if !path.is_anchored()
            && let Some(name) = self.host.resolve_type(&path.render(tree.interner()))
        {
            return self.table.foreign(&name, tree.interner());
        }

        match self.lookup_class(expr, path, ResolveMode::Reporting) {
            Some(ns) => self.nominal_for(ns),
            None => TYPE_NONE,
        }
    }

    fn lookup_class(&self, expr: NodeId, path: &Path, mode: ResolveMode) -> Option<NsId> {
        let scope = ensure_scope(self.ctx.tree, expr);
        self.resolver
            .resolve(
                expr,
                scope,
                path,
                KindSet::CONTAINERS,
                NsKind::Class.into(),
                mode,
            )
            .and_then(|r| r.single())
    }
}

use std::sync::Arc;

use gramforge_core::{Interner, Symbol};

use super::node::{NodeId, NodeKind, SyntaxNode};
use super::span::Span;

/// Arena of syntax nodes for every file of one analysis run.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    files: Vec<NodeId>,
    interner: Interner,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<SyntaxNode>, files: Vec<NodeId>, interner: Interner) -> Self {
        Self {
            nodes,
            files,
            interner,
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        self.node(id).kind()
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span()
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    /// File roots, in the order they were added.
    pub fn files(&self) -> &[NodeId] {
        &self.files
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn text(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_index(i), n))
    }

    /// Pre-order walk of `root` and everything below it.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![root],
        }
    }

    /// Every node whose kind matches `pred`, across all files, in pre-order.
    pub fn nodes_where<'a>(
        &'a self,
        pred: impl Fn(&NodeKind) -> bool + 'a,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.files
            .iter()
            .flat_map(move |&f| self.descendants(f))
            .filter(move |&id| pred(self.kind(id)))
    }

    /// File root containing `id`.
    pub fn file_of(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            cur = parent;
        }
        cur
    }

    pub fn file_name(&self, id: NodeId) -> Option<Arc<str>> {
        match self.kind(self.file_of(id)) {
            NodeKind::File { name } => Some(name.clone()),
            _ => None,
        }
    }

    /// Body (`Union`) of a non-terminal declaration.
    pub fn nonterm_body(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .rfind(|&c| matches!(self.kind(c), NodeKind::Union))
    }

    /// Declared type expression of a non-terminal.
    pub fn declared_type_expr(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .first()
            .copied()
            .filter(|&c| self.kind(c).is_type_expr())
    }

    /// Atom wrapped by an `Item`.
    pub fn item_atom(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .first()
            .copied()
            .filter(|&c| self.kind(c).is_atom())
    }

    /// Type expression attached to an item's label.
    pub fn item_label_type(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .skip(1)
            .find(|&c| self.kind(c).is_type_expr())
    }

    pub fn extends_clauses(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| matches!(self.kind(c), NodeKind::Extends { .. }))
    }

    pub fn package_clause(&self, file: NodeId) -> Option<NodeId> {
        self.children(file)
            .iter()
            .copied()
            .find(|&c| matches!(self.kind(c), NodeKind::PackageClause { .. }))
    }
}

/// Pre-order iterator returned by [`SyntaxTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

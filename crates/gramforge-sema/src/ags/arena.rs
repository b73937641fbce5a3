use super::invariants::{ensure_detached, ensure_list, ensure_live};
use super::node::{AgsId, AgsKind, AgsNode, Atom, Decoration};
use crate::syntax::{NodeId, Span};

/// Storage for every AGS node of one analysis run.
#[derive(Debug, Default)]
pub struct AgsArena {
    nodes: Vec<AgsNode>,
}

impl AgsArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn node(&self, id: AgsId) -> &AgsNode {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: AgsId) -> &mut AgsNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` sits in a list or belongs to an alternation.
    pub fn is_attached(&self, id: AgsId) -> bool {
        self.node(id).parent.is_some()
    }

    pub(crate) fn alloc_list(&mut self, kind: AgsKind, span: Span, origin: NodeId) -> AgsId {
        let id = AgsId::from_index(self.nodes.len());
        self.nodes.push(AgsNode::new(kind, None, span, origin));
        id
    }

    pub(crate) fn alloc_item(&mut self, atom: Atom, span: Span, origin: NodeId) -> AgsId {
        let id = AgsId::from_index(self.nodes.len());
        self.nodes
            .push(AgsNode::new(AgsKind::Item, Some(atom), span, origin));
        id
    }

    /// Link `child` at the end of `list`.
    ///
    /// # Panics
    /// Panics if `child` already has a parent or `list` is an item.
    pub(crate) fn append(&mut self, list: AgsId, child: AgsId) {
        ensure_list(self.node(list), list);
        ensure_live(self.node(child), child);
        ensure_detached(self.node(child), child);
        assert_ne!(list, child, "AGS node cannot contain itself");

        let tail = self.node(list).last;
        {
            let node = self.node_mut(child);
            node.parent = Some(list);
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(tail) => self.node_mut(tail).next = Some(child),
            None => self.node_mut(list).first = Some(child),
        }
        let list_node = self.node_mut(list);
        list_node.last = Some(child);
        list_node.len += 1;
    }

    /// Move every child of `from` to the end of `list`. `from` is left
    /// empty and dead.
    pub(crate) fn splice(&mut self, list: AgsId, from: AgsId) {
        ensure_list(self.node(list), list);
        ensure_detached(self.node(from), from);
        assert_ne!(list, from, "AGS node cannot be spliced into itself");

        let (first, last, count) = {
            let node = self.node(from);
            (node.first, node.last, node.len)
        };
        self.kill(from);
        let (Some(first), Some(last)) = (first, last) else {
            return;
        };

        let mut cur = Some(first);
        while let Some(id) = cur {
            let node = self.node_mut(id);
            node.parent = Some(list);
            cur = node.next;
        }

        match self.node(list).last {
            Some(tail) => {
                self.node_mut(tail).next = Some(first);
                self.node_mut(first).prev = Some(tail);
            }
            None => self.node_mut(list).first = Some(first),
        }
        let list_node = self.node_mut(list);
        list_node.last = Some(last);
        list_node.len += count;
    }

    /// Unlink `child` from its parent list, leaving it detached.
    pub(crate) fn unlink(&mut self, child: AgsId) {
        let (parent, prev, next) = {
            let node = self.node(child);
            (node.parent, node.prev, node.next)
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.node_mut(parent).first = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.node_mut(parent).last = prev,
        }
        self.node_mut(parent).len -= 1;
        let node = self.node_mut(child);
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// Mark `owner` as the parent of `child` without linking it into a
    /// list. Used for the element and separator of an alternation.
    pub(crate) fn adopt(&mut self, owner: AgsId, child: AgsId) {
        ensure_detached(self.node(child), child);
        self.node_mut(child).parent = Some(owner);
    }

    pub(crate) fn decorate(&mut self, id: AgsId, decoration: Decoration) {
        self.node_mut(id).decorations.push(decoration);
    }

    /// Drop an emptied list from the graph.
    pub(crate) fn kill(&mut self, id: AgsId) {
        let node = self.node_mut(id);
        node.first = None;
        node.last = None;
        node.len = 0;
        node.live = false;
    }

    /// Ordered children of a list node; nothing for an item.
    pub fn children(&self, id: AgsId) -> Children<'_> {
        Children {
            arena: self,
            next: self.node(id).first,
        }
    }

    /// View `id` as a list of `kind`: its own children when it is an
    /// undecorated list of that kind, otherwise `id` itself.
    ///
    /// A one-element list may have been collapsed into its element; both
    /// iterate the same way.
    pub fn iter_as(&self, id: AgsId, kind: AgsKind) -> IterAs<'_> {
        let node = self.node(id);
        if node.kind == kind && kind != AgsKind::Item && !node.is_decorated() {
            IterAs::List(self.children(id))
        } else {
            IterAs::Single(Some(id))
        }
    }

    /// Whether `id` stays a unit when placed in a list: an item, or any
    /// decorated node.
    pub fn is_atomic(&self, id: AgsId) -> bool {
        let node = self.node(id);
        node.kind == AgsKind::Item || node.is_decorated()
    }

    /// Undecorated empty `CONCAT`: derives only the empty string.
    pub fn is_empty_concat(&self, id: AgsId) -> bool {
        let node = self.node(id);
        node.kind == AgsKind::Concat && node.len == 0 && !node.is_decorated()
    }
}

/// Iterator over the children of a list node.
#[derive(Clone)]
pub struct Children<'a> {
    arena: &'a AgsArena,
    next: Option<AgsId>,
}

impl Iterator for Children<'_> {
    type Item = AgsId;

    fn next(&mut self) -> Option<AgsId> {
        let id = self.next?;
        self.next = self.arena.node(id).next;
        Some(id)
    }
}

/// Iterator returned by [`AgsArena::iter_as`].
#[derive(Clone)]
pub enum IterAs<'a> {
    List(Children<'a>),
    Single(Option<AgsId>),
}

impl Iterator for IterAs<'_> {
    type Item = AgsId;

    fn next(&mut self) -> Option<AgsId> {
        match self {
            IterAs::List(children) => children.next(),
            IterAs::Single(id) => id.take(),
        }
    }
}

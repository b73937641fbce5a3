use std::sync::Arc;

use gramforge_core::{Interner, Symbol};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use super::kind::{KindSet, NsKind};
use crate::syntax::{NodeId, Span};

/// Handle to a namespace node. Stable for the lifetime of the tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NsId(u32);

impl NsId {
    pub const ROOT: NsId = NsId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a namespace node was declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclSite {
    pub node: NodeId,
    pub span: Span,
    pub file: Option<Arc<str>>,
}

/// Child nodes of one name, grouped by kind in declaration order.
pub type KindBuckets = IndexMap<NsKind, Vec<NsId>>;

/// Children of a namespace node: name, then kind, then nodes.
pub type ChildMap = IndexMap<Symbol, KindBuckets>;

#[derive(Debug)]
pub struct NsNode {
    id: NsId,
    kind: NsKind,
    name: Option<Symbol>,
    parent: Option<NsId>,
    /// Copy-on-write: readers clone the `Arc`, writers `make_mut` under the lock.
    children: Mutex<Arc<ChildMap>>,
    decls: Mutex<Vec<DeclSite>>,
}

impl NsNode {
    fn new(id: NsId, kind: NsKind, name: Option<Symbol>, parent: Option<NsId>) -> Self {
        Self {
            id,
            kind,
            name,
            parent,
            children: Mutex::new(Arc::new(ChildMap::new())),
            decls: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> NsId {
        self.id
    }

    pub fn kind(&self) -> NsKind {
        self.kind
    }

    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn parent(&self) -> Option<NsId> {
        self.parent
    }

    /// Consistent view of the children at the time of the call. Later
    /// declarations do not show up in a snapshot already taken.
    pub fn children(&self) -> Arc<ChildMap> {
        Arc::clone(&self.children.lock())
    }

    pub fn decl_sites(&self) -> Vec<DeclSite> {
        self.decls.lock().clone()
    }
}

/// The namespace tree. Safe to populate from several threads at once.
#[derive(Debug)]
pub struct NamespaceTree {
    nodes: RwLock<Vec<Arc<NsNode>>>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Tree holding only the nameless root.
    pub fn new() -> Self {
        let root = NsNode::new(NsId::ROOT, NsKind::Root, None, None);
        Self {
            nodes: RwLock::new(vec![Arc::new(root)]),
        }
    }

    pub fn root(&self) -> NsId {
        NsId::ROOT
    }

    pub fn node(&self, id: NsId) -> Arc<NsNode> {
        Arc::clone(&self.nodes.read()[id.index()])
    }

    pub fn kind(&self, id: NsId) -> NsKind {
        self.nodes.read()[id.index()].kind
    }

    pub fn name(&self, id: NsId) -> Option<Symbol> {
        self.nodes.read()[id.index()].name
    }

    pub fn parent(&self, id: NsId) -> Option<NsId> {
        self.nodes.read()[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn ids(&self) -> impl Iterator<Item = NsId> {
        (0..self.len() as u32).map(NsId)
    }

    /// Record a declaration of `name` with `kind` under `parent`.
    ///
    /// For an open kind, an existing same-named, same-kind child is reused
    /// and the site appended to it. Otherwise a new node is created. The
    /// returned handle is final.
    pub fn declare_child(&self, parent: NsId, name: Symbol, kind: NsKind, site: DeclSite) -> NsId {
        let parent_node = self.node(parent);
        let mut children = parent_node.children.lock();

        if kind.is_open()
            && let Some(&existing) = children
                .get(&name)
                .and_then(|buckets| buckets.get(&kind))
                .and_then(|ids| ids.first())
        {
            self.node(existing).decls.lock().push(site);
            return existing;
        }

        let id = {
            let mut nodes = self.nodes.write();
            let id = NsId(nodes.len() as u32);
            let node = NsNode::new(id, kind, Some(name), Some(parent));
            node.decls.lock().push(site);
            nodes.push(Arc::new(node));
            id
        };

        Arc::make_mut(&mut *children)
            .entry(name)
            .or_default()
            .entry(kind)
            .or_default()
            .push(id);
        id
    }

    /// Snapshot of `id`'s children.
    pub fn children_snapshot(&self, id: NsId) -> Arc<ChildMap> {
        self.node(id).children()
    }

    /// Children of `parent` named `name` whose kind is in `kinds`.
    pub fn lookup_child(&self, parent: NsId, name: Symbol, kinds: KindSet) -> Vec<(NsKind, Vec<NsId>)> {
        let children = self.children_snapshot(parent);
        let Some(buckets) = children.get(&name) else {
            return Vec::new();
        };
        buckets
            .iter()
            .filter(|(kind, _)| kinds.contains(**kind))
            .map(|(kind, ids)| (*kind, ids.clone()))
            .collect()
    }

    pub fn decl_sites(&self, id: NsId) -> Vec<DeclSite> {
        self.node(id).decl_sites()
    }

    /// First declaration site, used to anchor diagnostics about the node.
    pub fn first_site(&self, id: NsId) -> Option<DeclSite> {
        self.node(id).decls.lock().first().cloned()
    }

    /// Dotted name from the root, e.g. `lib.expr.G`. The root itself
    /// renders as `<root>`.
    pub fn qualified_name(&self, id: NsId, interner: &Interner) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(ns) = cur {
            if let Some(name) = self.name(ns) {
                parts.push(interner.resolve(name));
            }
            cur = self.parent(ns);
        }
        if parts.is_empty() {
            return "<root>".to_string();
        }
        parts.reverse();
        parts.join(".")
    }

    /// All nodes at the dotted path `a.b.C`, following the first node of
    /// each intermediate segment.
    pub fn find_qualified(&self, interner: &Interner, dotted: &str) -> Vec<NsId> {
        let mut current = vec![self.root()];
        for part in dotted.split('.') {
            let Some(&parent) = current.first() else {
                return Vec::new();
            };
            let Some(name) = interner.get(part) else {
                return Vec::new();
            };
            current = self
                .children_snapshot(parent)
                .get(&name)
                .map(|buckets| buckets.values().flatten().copied().collect())
                .unwrap_or_default();
        }
        current
    }
}

use gramforge_core::{Symbol, WriteOnce};
use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, RwLock};

use crate::namespace::{ChildMap, KindSet, NamespaceTree, NsId, NsKind};
use crate::syntax::NodeId;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a binding entered a scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Origin {
    Local,
    Imported,
}

/// Namespace nodes bound to one (name, kind) pair of a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    nodes: IndexSet<NsId>,
    origin: Origin,
    /// Import statements that contributed the current nodes.
    sites: Vec<NodeId>,
}

impl Binding {
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NsId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn import_sites(&self) -> &[NodeId] {
        &self.sites
    }
}

/// Bindings of one scope: name, then kind, then binding.
#[derive(Clone, Debug, Default)]
pub struct ScopeTable {
    entries: IndexMap<Symbol, IndexMap<NsKind, Binding>>,
}

impl ScopeTable {
    /// Add `nodes` under `(name, kind)`.
    ///
    /// Open kinds accumulate every write. For sealed kinds a local binding
    /// is never displaced by an import, and a later import replaces an
    /// earlier imported binding.
    pub(crate) fn bind(
        &mut self,
        name: Symbol,
        kind: NsKind,
        nodes: impl IntoIterator<Item = NsId>,
        origin: Origin,
        site: Option<NodeId>,
    ) {
        let slot = self.entries.entry(name).or_default().entry(kind);
        let binding = match slot {
            indexmap::map::Entry::Vacant(vacant) => {
                vacant.insert(Binding {
                    nodes: nodes.into_iter().collect(),
                    origin,
                    sites: site.into_iter().collect(),
                });
                return;
            }
            indexmap::map::Entry::Occupied(occupied) => occupied.into_mut(),
        };

        match (kind.is_open(), binding.origin, origin) {
            (true, _, _) | (false, _, Origin::Local) => {
                binding.nodes.extend(nodes);
                binding.sites.extend(site);
                if origin == Origin::Local {
                    binding.origin = Origin::Local;
                }
            }
            (false, Origin::Imported, Origin::Imported) => {
                binding.nodes = nodes.into_iter().collect();
                binding.sites = site.into_iter().collect();
            }
            (false, Origin::Local, Origin::Imported) => {}
        }
    }

    /// Bindings for `name` whose kind is in `kinds`.
    pub fn lookup(&self, name: Symbol, kinds: KindSet) -> Vec<(NsKind, &Binding)> {
        let Some(by_kind) = self.entries.get(&name) else {
            return Vec::new();
        };
        by_kind
            .iter()
            .filter(|(kind, binding)| kinds.contains(**kind) && !binding.is_empty())
            .map(|(kind, binding)| (*kind, binding))
            .collect()
    }

    /// Every binding of `kind`, in first-binding order.
    pub fn entries_of_kind(&self, kind: NsKind) -> Vec<(Symbol, Vec<NsId>)> {
        self.entries
            .iter()
            .filter_map(|(name, by_kind)| {
                by_kind
                    .get(&kind)
                    .map(|binding| (*name, binding.nodes().collect()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub struct Scope {
    id: ScopeId,
    parent: Option<ScopeId>,
    owner: Option<NodeId>,
    namespace: WriteOnce<NsId>,
    table: RwLock<ScopeTable>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Syntax node that opened the scope. `None` for the global scope.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Namespace node the scope stands for, once bound.
    pub fn namespace(&self) -> Option<NsId> {
        self.namespace.copied()
    }

    /// Copy of the current bindings.
    pub fn table(&self) -> ScopeTable {
        self.table.read().clone()
    }
}

/// Every scope of one analysis run.
///
/// The shape of the tree is fixed by [`push`](Self::push) before any
/// binding happens; afterwards bindings go through shared references.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    used_imports: Mutex<IndexSet<NodeId>>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Tree holding only the global scope, bound to the namespace root.
    pub fn new() -> Self {
        let global = Scope {
            id: ScopeId::GLOBAL,
            parent: None,
            owner: None,
            namespace: WriteOnce::from(NsId::ROOT),
            table: RwLock::new(ScopeTable::default()),
        };
        Self {
            scopes: vec![global],
            used_imports: Mutex::new(IndexSet::new()),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    pub(crate) fn push(&mut self, parent: ScopeId, owner: NodeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            owner: Some(owner),
            namespace: WriteOnce::new(),
            table: RwLock::new(ScopeTable::default()),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).parent
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// `id` and its ancestors, innermost first.
    pub fn chain(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), |&s| self.parent(s))
    }

    pub fn outermost(&self, id: ScopeId) -> ScopeId {
        self.chain(id).last().unwrap_or(id)
    }

    pub(crate) fn bind_namespace(&self, scope: ScopeId, ns: NsId) {
        self.scope(scope).namespace.set(ns);
    }

    pub(crate) fn declare_local(&self, scope: ScopeId, name: Symbol, kind: NsKind, ns: NsId) {
        self.scope(scope)
            .table
            .write()
            .bind(name, kind, [ns], Origin::Local, None);
    }

    /// Import every child of `ns` into `scope`.
    pub(crate) fn import_all(&self, scope: ScopeId, names: &NamespaceTree, ns: NsId, site: Option<NodeId>) {
        let snapshot = names.children_snapshot(ns);
        self.import_map(scope, &snapshot, site);
    }

    pub(crate) fn import_map(&self, scope: ScopeId, children: &ChildMap, site: Option<NodeId>) {
        let mut table = self.scope(scope).table.write();
        for (name, buckets) in children {
            for (kind, ids) in buckets {
                table.bind(*name, *kind, ids.iter().copied(), Origin::Imported, site);
            }
        }
    }

    /// Import `ns` itself into `scope`, under `alias` or its own name.
    pub(crate) fn import_one(
        &self,
        scope: ScopeId,
        names: &NamespaceTree,
        ns: NsId,
        alias: Option<Symbol>,
        site: Option<NodeId>,
    ) {
        let Some(name) = alias.or_else(|| names.name(ns)) else {
            return;
        };
        self.scope(scope)
            .table
            .write()
            .bind(name, names.kind(ns), [ns], Origin::Imported, site);
    }

    pub(crate) fn lookup_in(&self, scope: ScopeId, name: Symbol, kinds: KindSet) -> Vec<(NsKind, Binding)> {
        self.scope(scope)
            .table
            .read()
            .lookup(name, kinds)
            .into_iter()
            .map(|(kind, binding)| (kind, binding.clone()))
            .collect()
    }

    pub(crate) fn mark_used(&self, sites: &[NodeId]) {
        if sites.is_empty() {
            return;
        }
        self.used_imports.lock().extend(sites.iter().copied());
    }

    /// Whether a reporting lookup ever went through the import at `site`.
    pub fn is_import_used(&self, site: NodeId) -> bool {
        self.used_imports.lock().contains(&site)
    }
}

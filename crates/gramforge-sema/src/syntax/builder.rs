use std::sync::Arc;

use gramforge_core::{Interner, Symbol};

use super::node::{NodeId, NodeKind, Quantifier, SyntaxNode};
use super::path::{Path, Segment};
use super::span::{Position, Span};
use super::tree::SyntaxTree;

/// Bottom-up constructor for [`SyntaxTree`]s.
///
/// Parsers call [`node_at`](Self::node_at) with real spans. The remaining
/// helpers build common shapes with synthetic, strictly increasing spans so
/// that hand-written trees still sort deterministically.
///
/// # Panics
/// Attaching a node that already has a parent panics.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    files: Vec<NodeId>,
    interner: Interner,
    cursor: u32,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Parse `a.b.C` into a path. A leading `*` anchors it at the
    /// outermost scope.
    pub fn path(&mut self, dotted: &str) -> Path {
        let segments = dotted
            .split('.')
            .map(|part| match part {
                "*" => Segment::Wildcard,
                name => Segment::Name(self.interner.intern(name)),
            })
            .collect();
        Path::new(segments)
    }

    /// Add a node with an explicit span and attach `children` to it.
    pub fn node_at(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        for &child in &children {
            self.nodes[child.index()].parent_slot().set(id);
        }
        self.nodes.push(SyntaxNode::new(kind, span, children));
        id
    }

    /// Add a node with a synthetic span.
    pub fn node(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let span = self.next_span();
        self.node_at(kind, span, children)
    }

    /// Register `root` as a file root. Roots must be `File` nodes.
    pub fn add_file(&mut self, root: NodeId) {
        assert!(
            matches!(self.nodes[root.index()].kind(), NodeKind::File { .. }),
            "file roots must be `File` nodes"
        );
        self.files.push(root);
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree::from_parts(self.nodes, self.files, self.interner)
    }

    fn next_span(&mut self) -> Span {
        let at = self.cursor;
        self.cursor += 1;
        Span::new(Position::new(1, at + 1, at), Position::new(1, at + 2, at + 1))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent_slot().set(parent);
        self.nodes[parent.index()].push_child(child);
    }

    fn item_fields(&self, item: NodeId) -> (Option<Symbol>, Option<Quantifier>) {
        match self.nodes[item.index()].kind() {
            NodeKind::Item { label, quantifier } => (*label, *quantifier),
            other => panic!("expected an `Item`, found `{}`", other.name()),
        }
    }

    // Declarations

    /// File root, with an optional `package a.b;` clause.
    pub fn file(&mut self, name: &str, package: Option<&str>, body: Vec<NodeId>) -> NodeId {
        let mut children = Vec::with_capacity(body.len() + 1);
        if let Some(pkg) = package {
            let path = self.path(pkg);
            children.push(self.node(NodeKind::PackageClause { path }, vec![]));
        }
        children.extend(body);
        let root = self.node(
            NodeKind::File {
                name: Arc::from(name),
            },
            children,
        );
        self.add_file(root);
        root
    }

    /// `import a.b.C;` or, with a trailing `.*`, `import a.b.*;`.
    pub fn import(&mut self, dotted: &str) -> NodeId {
        let (base, wildcard) = match dotted.strip_suffix(".*") {
            Some(base) => (base, true),
            None => (dotted, false),
        };
        let path = self.path(base);
        self.node(
            NodeKind::Import {
                path,
                wildcard,
                alias: None,
            },
            vec![],
        )
    }

    /// `import a.b.C as D;`
    pub fn import_as(&mut self, dotted: &str, alias: &str) -> NodeId {
        let path = self.path(dotted);
        let alias = Some(self.intern(alias));
        self.node(
            NodeKind::Import {
                path,
                wildcard: false,
                alias,
            },
            vec![],
        )
    }

    pub fn package(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let name = self.intern(name);
        self.node(NodeKind::Package { name }, members)
    }

    pub fn grammar(&mut self, name: &str, extends: &[&str], members: Vec<NodeId>) -> NodeId {
        let name = self.intern(name);
        let mut children = Vec::with_capacity(extends.len() + members.len());
        for parent in extends {
            children.push(self.extends(parent));
        }
        children.extend(members);
        self.node(NodeKind::Grammar { name }, children)
    }

    pub fn class(&mut self, name: &str, extends: Option<&str>) -> NodeId {
        let name = self.intern(name);
        let children = extends.map(|p| self.extends(p)).into_iter().collect();
        self.node(NodeKind::Class { name }, children)
    }

    pub fn extends(&mut self, dotted: &str) -> NodeId {
        let path = self.path(dotted);
        self.node(NodeKind::Extends { path }, vec![])
    }

    /// `name = rhs;` where `rhs` is a `Union`.
    pub fn nonterm(&mut self, name: &str, rhs: NodeId) -> NodeId {
        let name = self.intern(name);
        self.node(NodeKind::Nonterminal { name }, vec![rhs])
    }

    /// `name : ty = rhs;`
    pub fn nonterm_typed(&mut self, name: &str, ty: NodeId, rhs: NodeId) -> NodeId {
        let name = self.intern(name);
        self.node(NodeKind::Nonterminal { name }, vec![ty, rhs])
    }

    // Right-hand sides

    pub fn union(&mut self, alternatives: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Union, alternatives)
    }

    pub fn concat(&mut self, items: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Concat, items)
    }

    /// Union of concatenations: `a b | c`.
    pub fn alts(&mut self, alternatives: Vec<Vec<NodeId>>) -> NodeId {
        let concats = alternatives
            .into_iter()
            .map(|items| self.concat(items))
            .collect();
        self.union(concats)
    }

    /// Single-alternative right-hand side: `a b c`.
    pub fn seq(&mut self, items: Vec<NodeId>) -> NodeId {
        self.alts(vec![items])
    }

    /// Right-hand side deriving only the empty string.
    pub fn empty(&mut self) -> NodeId {
        self.alts(vec![vec![]])
    }

    /// Undecorated item around `atom`.
    pub fn item(&mut self, atom: NodeId) -> NodeId {
        self.node(
            NodeKind::Item {
                label: None,
                quantifier: None,
            },
            vec![atom],
        )
    }

    /// Reference to a non-terminal.
    pub fn nt(&mut self, dotted: &str) -> NodeId {
        let path = self.path(dotted);
        let atom = self.node(NodeKind::NontermRef { path }, vec![]);
        self.item(atom)
    }

    pub fn lit(&mut self, text: &str) -> NodeId {
        let atom = self.node(
            NodeKind::Literal {
                text: Arc::from(text),
            },
            vec![],
        );
        self.item(atom)
    }

    pub fn action(&mut self, code: &str) -> NodeId {
        let atom = self.node(
            NodeKind::Action {
                code: Arc::from(code),
            },
            vec![],
        );
        self.item(atom)
    }

    pub fn guard(&mut self, code: &str) -> NodeId {
        let atom = self.node(
            NodeKind::Guard {
                code: Arc::from(code),
            },
            vec![],
        );
        self.item(atom)
    }

    pub fn placeholder(&mut self) -> NodeId {
        let atom = self.node(NodeKind::Placeholder, vec![]);
        self.item(atom)
    }

    /// `( rhs )` where `rhs` is a `Union`.
    pub fn group(&mut self, rhs: NodeId) -> NodeId {
        let atom = self.node(NodeKind::Group, vec![rhs]);
        self.item(atom)
    }

    /// `[ element , separator ]` with an optional repetition marker.
    pub fn alternation(
        &mut self,
        element: NodeId,
        separator: NodeId,
        quantifier: Option<Quantifier>,
    ) -> NodeId {
        let atom = self.node(NodeKind::Alternation, vec![element, separator]);
        self.node(
            NodeKind::Item {
                label: None,
                quantifier,
            },
            vec![atom],
        )
    }

    /// `label: item`. An already labeled item is wrapped in a group first.
    pub fn labeled(&mut self, item: NodeId, label: &str) -> NodeId {
        let item = match self.item_fields(item) {
            (Some(_), _) => self.wrap_group(item),
            _ => item,
        };
        let sym = self.intern(label);
        if let NodeKind::Item { label, .. } = self.nodes[item.index()].kind_mut() {
            *label = Some(sym);
        }
        item
    }

    /// `label: ty = item`, a label with a declared type.
    pub fn typed_label(&mut self, item: NodeId, label: &str, ty: NodeId) -> NodeId {
        let item = self.labeled(item, label);
        self.attach(item, ty);
        item
    }

    /// `item?`, `item*`, `item+`. A labeled or quantified item is wrapped in
    /// a group first, so the quantifier applies to the whole of it.
    pub fn quantified(&mut self, item: NodeId, quantifier: Quantifier) -> NodeId {
        let item = match self.item_fields(item) {
            (None, None) => item,
            _ => self.wrap_group(item),
        };
        if let NodeKind::Item { quantifier: q, .. } = self.nodes[item.index()].kind_mut() {
            *q = Some(quantifier);
        }
        item
    }

    fn wrap_group(&mut self, item: NodeId) -> NodeId {
        let rhs = self.seq(vec![item]);
        self.group(rhs)
    }

    // Type expressions

    pub fn type_name(&mut self, dotted: &str) -> NodeId {
        let path = self.path(dotted);
        self.node(NodeKind::TypeName { path }, vec![])
    }

    pub fn array_type(&mut self, element: NodeId) -> NodeId {
        self.node(NodeKind::ArrayType, vec![element])
    }

    pub fn object_type(&mut self, fields: Vec<(&str, NodeId)>) -> NodeId {
        let (names, types): (Vec<Symbol>, Vec<NodeId>) = fields
            .into_iter()
            .map(|(name, ty)| (self.interner.intern(name), ty))
            .unzip();
        self.node(NodeKind::ObjectType { fields: names }, types)
    }
}

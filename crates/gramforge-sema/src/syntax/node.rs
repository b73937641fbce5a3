use std::fmt;
use std::sync::Arc;

use gramforge_core::{Symbol, WriteOnce};

use super::path::Path;
use super::span::Span;
use crate::namespace::{NsId, NsKind};
use crate::scope::{Resolution, ScopeId};
use crate::types::TypeId;

/// Index of a node in its [`SyntaxTree`](super::SyntaxTree).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Repetition marker on an item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Quantifier {
    Optional,
    Star,
    Plus,
}

impl Quantifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Quantifier::Optional => "?",
            Quantifier::Star => "*",
            Quantifier::Plus => "+",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node kinds with their payload.
///
/// Child layout per kind:
///
/// | kind            | children                                            |
/// |-----------------|-----------------------------------------------------|
/// | `File`          | optional `PackageClause`, `Import`s, declarations   |
/// | `Package`       | declarations                                        |
/// | `Grammar`       | `Extends`s, then `Nonterminal`s and `Class`es       |
/// | `Class`         | optional `Extends`                                  |
/// | `Nonterminal`   | optional type expression, then a `Union` body       |
/// | `Union`         | `Concat`s                                           |
/// | `Concat`        | `Item`s                                             |
/// | `Item`          | one atom, then an optional label type expression    |
/// | `Group`         | one `Union`                                         |
/// | `Alternation`   | element `Union`, separator `Union`                  |
/// | `ArrayType`     | element type expression                             |
/// | `ObjectType`    | one type expression per field                       |
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    File {
        name: Arc<str>,
    },
    PackageClause {
        path: Path,
    },
    Import {
        path: Path,
        wildcard: bool,
        alias: Option<Symbol>,
    },

    Package {
        name: Symbol,
    },
    Grammar {
        name: Symbol,
    },
    Class {
        name: Symbol,
    },
    Nonterminal {
        name: Symbol,
    },
    Extends {
        path: Path,
    },

    Union,
    Concat,
    Item {
        label: Option<Symbol>,
        quantifier: Option<Quantifier>,
    },

    NontermRef {
        path: Path,
    },
    Literal {
        text: Arc<str>,
    },
    Group,
    Alternation,
    Action {
        code: Arc<str>,
    },
    Guard {
        code: Arc<str>,
    },
    Placeholder,

    TypeName {
        path: Path,
    },
    ArrayType,
    ObjectType {
        fields: Vec<Symbol>,
    },
}

impl NodeKind {
    /// Namespace kind introduced by a declaration node.
    pub fn ns_kind(&self) -> Option<NsKind> {
        match self {
            NodeKind::Package { .. } => Some(NsKind::Package),
            NodeKind::Grammar { .. } => Some(NsKind::Grammar),
            NodeKind::Class { .. } => Some(NsKind::Class),
            NodeKind::Nonterminal { .. } => Some(NsKind::Nonterminal),
            _ => None,
        }
    }

    /// Declared name of a declaration node.
    pub fn declared_name(&self) -> Option<Symbol> {
        match self {
            NodeKind::Package { name }
            | NodeKind::Grammar { name }
            | NodeKind::Class { name }
            | NodeKind::Nonterminal { name } => Some(*name),
            _ => None,
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.ns_kind().is_some()
    }

    /// Whether the node opens a lexical scope of its own.
    pub fn owns_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::File { .. }
                | NodeKind::Package { .. }
                | NodeKind::Grammar { .. }
                | NodeKind::Class { .. }
        )
    }

    pub fn is_type_expr(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeName { .. } | NodeKind::ArrayType | NodeKind::ObjectType { .. }
        )
    }

    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            NodeKind::NontermRef { .. }
                | NodeKind::Literal { .. }
                | NodeKind::Group
                | NodeKind::Alternation
                | NodeKind::Action { .. }
                | NodeKind::Guard { .. }
                | NodeKind::Placeholder
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::File { .. } => "File",
            NodeKind::PackageClause { .. } => "PackageClause",
            NodeKind::Import { .. } => "Import",
            NodeKind::Package { .. } => "Package",
            NodeKind::Grammar { .. } => "Grammar",
            NodeKind::Class { .. } => "Class",
            NodeKind::Nonterminal { .. } => "Nonterminal",
            NodeKind::Extends { .. } => "Extends",
            NodeKind::Union => "Union",
            NodeKind::Concat => "Concat",
            NodeKind::Item { .. } => "Item",
            NodeKind::NontermRef { .. } => "NontermRef",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Group => "Group",
            NodeKind::Alternation => "Alternation",
            NodeKind::Action { .. } => "Action",
            NodeKind::Guard { .. } => "Guard",
            NodeKind::Placeholder => "Placeholder",
            NodeKind::TypeName { .. } => "TypeName",
            NodeKind::ArrayType => "ArrayType",
            NodeKind::ObjectType { .. } => "ObjectType",
        }
    }
}

/// A node of the syntax tree together with its analysis slots.
#[derive(Debug)]
pub struct SyntaxNode {
    kind: NodeKind,
    span: Span,
    parent: WriteOnce<NodeId>,
    children: Vec<NodeId>,

    scope: WriteOnce<ScopeId>,
    declared: WriteOnce<NsId>,
    referenced: WriteOnce<Resolution>,
    ty: WriteOnce<TypeId>,
}

impl SyntaxNode {
    pub(crate) fn new(kind: NodeKind, span: Span, children: Vec<NodeId>) -> Self {
        Self {
            kind,
            span,
            parent: WriteOnce::new(),
            children,
            scope: WriteOnce::new(),
            declared: WriteOnce::new(),
            referenced: WriteOnce::new(),
            ty: WriteOnce::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.copied()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn parent_slot(&self) -> &WriteOnce<NodeId> {
        &self.parent
    }

    /// Scope the node belongs to. Scope-owning nodes report their own scope.
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.copied()
    }

    /// Namespace node a declaration was recorded under.
    pub fn declared(&self) -> Option<NsId> {
        self.declared.copied()
    }

    /// Resolution of a reference, import or extends clause.
    pub fn referenced(&self) -> Option<&Resolution> {
        self.referenced.get()
    }

    /// Type computed for a type expression, class or typed declaration.
    pub fn ty(&self) -> Option<TypeId> {
        self.ty.copied()
    }

    pub(crate) fn set_scope(&self, scope: ScopeId) {
        self.scope.set(scope);
    }

    pub(crate) fn set_declared(&self, ns: NsId) {
        self.declared.set(ns);
    }

    pub(crate) fn set_referenced(&self, resolution: Resolution) {
        self.referenced.set(resolution);
    }

    pub(crate) fn set_ty(&self, ty: TypeId) {
        self.ty.set(ty);
    }
}

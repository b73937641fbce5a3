use std::sync::Arc;

use gramforge_core::{Symbol, WriteOnce};

use super::symbols::Snapshot;
use crate::syntax::{NodeId, Quantifier, Span};

/// Handle to a node of an [`AgsArena`](super::AgsArena).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AgsId(u32);

impl AgsId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AgsKind {
    Union,
    Concat,
    Item,
}

impl AgsKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgsKind::Union => "UNION",
            AgsKind::Concat => "CONCAT",
            AgsKind::Item => "ITEM",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ActionKind {
    Action,
    Guard,
    Placeholder,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Action => "action",
            ActionKind::Guard => "guard",
            ActionKind::Placeholder => "placeholder",
        }
    }
}

/// Payload of an `ITEM` node.
#[derive(Debug)]
pub enum Atom {
    /// Non-terminal reference; the resolution lives in the syntax node.
    Reference { node: NodeId },
    Literal { text: Arc<str> },
    /// `[element, separator]`: one or more elements separated by separators.
    Alternation {
        element: AgsId,
        separator: AgsId,
        repeat: Option<Quantifier>,
    },
    /// Embedded code. `snapshot` holds the labels visible at this point.
    Action {
        kind: ActionKind,
        code: Arc<str>,
        snapshot: WriteOnce<Snapshot>,
    },
}

/// Label or quantifier attached to a node, applied in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoration {
    Label {
        name: Symbol,
        /// Declared type expression of the label, if any.
        ty: Option<NodeId>,
        span: Span,
    },
    Quantifier(Quantifier),
}

/// A node of the abstract grammar specification.
///
/// `UNION` and `CONCAT` nodes hold an ordered list of children, linked
/// through `first`/`last` and the children's `prev`/`next`.
#[derive(Debug)]
pub struct AgsNode {
    pub(crate) kind: AgsKind,
    pub(crate) parent: Option<AgsId>,
    pub(crate) first: Option<AgsId>,
    pub(crate) last: Option<AgsId>,
    pub(crate) prev: Option<AgsId>,
    pub(crate) next: Option<AgsId>,
    pub(crate) len: u32,
    pub(crate) atom: Option<Atom>,
    pub(crate) decorations: Vec<Decoration>,
    pub(crate) span: Span,
    pub(crate) origin: NodeId,
    pub(crate) live: bool,
}

impl AgsNode {
    pub(crate) fn new(kind: AgsKind, atom: Option<Atom>, span: Span, origin: NodeId) -> Self {
        Self {
            kind,
            parent: None,
            first: None,
            last: None,
            prev: None,
            next: None,
            len: 0,
            atom,
            decorations: Vec::new(),
            span,
            origin,
            live: true,
        }
    }

    pub fn kind(&self) -> AgsKind {
        self.kind
    }

    pub fn parent(&self) -> Option<AgsId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn atom(&self) -> Option<&Atom> {
        self.atom.as_ref()
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn is_decorated(&self) -> bool {
        !self.decorations.is_empty()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Syntax node this node was built from.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Whether the node is still part of a graph. Lists emptied by
    /// splicing are dead.
    pub fn is_live(&self) -> bool {
        self.live
    }
}

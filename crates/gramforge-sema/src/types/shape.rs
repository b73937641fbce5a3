use std::collections::BTreeMap;
use std::sync::Arc;

use gramforge_core::Symbol;

use crate::namespace::NsId;

/// Handle to an interned type. Equal shapes always get the same id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == TYPE_NONE
    }
}

/// "No type": absorbs LUB computations and is assignable from anything.
pub const TYPE_NONE: TypeId = TypeId(0);

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeShape {
    NoType,
    Array(TypeId),
    Object(BTreeMap<Symbol, TypeId>),
    /// A class declared in the grammar. `parent` is set only when the
    /// `extends` clause resolved and is not part of a cycle.
    Nominal {
        name: Symbol,
        decl: NsId,
        parent: Option<TypeId>,
    },
    /// A type known to the host language.
    Foreign {
        name: Arc<str>,
    },
}

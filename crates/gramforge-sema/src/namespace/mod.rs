//! Global catalog of declared names.
//!
//! The namespace tree records what exists and where it was declared; it
//! knows nothing about visibility. Open kinds (packages, non-terminals)
//! merge repeated declarations into one node, sealed kinds (grammars,
//! classes) get a fresh node per declaration.

mod kind;
mod tree;


pub use kind::{KindSet, NsKind};
pub use tree::{ChildMap, DeclSite, KindBuckets, NamespaceTree, NsId, NsNode};

//! Analysis invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::scope::ScopeId;
use crate::syntax::{NodeId, SyntaxTree};

/// Scope slot of a node inside a file. Scope construction covers every
/// node reachable from a file root.
#[inline]
pub(super) fn ensure_scope(tree: &SyntaxTree, node: NodeId) -> ScopeId {
    tree.node(node).scope().unwrap_or_else(|| {
        panic!(
            "{} node #{} has no scope (scopes not built?)",
            tree.kind(node).name(),
            node.index()
        )
    })
}

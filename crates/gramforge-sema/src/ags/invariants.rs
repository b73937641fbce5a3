//! Graph invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::node::{AgsId, AgsKind, AgsNode};

#[inline]
pub(super) fn ensure_detached(node: &AgsNode, id: AgsId) {
    if let Some(parent) = node.parent {
        panic!(
            "AGS node #{} is already attached to #{} (a node has at most one parent)",
            id.index(),
            parent.index()
        );
    }
}

#[inline]
pub(super) fn ensure_list(node: &AgsNode, id: AgsId) {
    if node.kind == AgsKind::Item {
        panic!("AGS node #{} is an ITEM and holds no children", id.index());
    }
}

#[inline]
pub(super) fn ensure_live(node: &AgsNode, id: AgsId) {
    if !node.live {
        panic!("AGS node #{} was spliced away and must not be reused", id.index());
    }
}

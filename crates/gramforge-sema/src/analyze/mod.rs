//! Semantic analysis phases.
//!
//! Each phase reads the syntax tree and the structures built by earlier
//! phases and fills in write-once slots. Phase order is fixed by
//! [`crate::pipeline`]:
//!
//! 1. [`declare`]: scopes, then namespace nodes and local bindings.
//! 2. [`validate`]: containment, duplicates and kind clashes.
//! 3. [`imports`]: global, package, explicit and inherited imports.
//! 4. [`refs`]: non-terminal references in grammar bodies.
//! 5. [`extends`]: inheritance cycles.
//! 6. [`types_init`]: class types and declared type expressions.

pub mod declare;
pub mod extends;
pub mod imports;
pub mod refs;
pub mod types_init;
pub mod validate;

mod invariants;

#[cfg(test)]
mod imports_tests;

use crate::diagnostics::Diagnostics;
use crate::namespace::{DeclSite, NamespaceTree};
use crate::scope::{Resolver, ScopeTree};
use crate::syntax::{NodeId, SyntaxTree};

/// Shared, read-only view of the analysis state passed to every phase.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub tree: &'a SyntaxTree,
    pub names: &'a NamespaceTree,
    pub scopes: &'a ScopeTree,
    pub diag: &'a Diagnostics,
}

impl<'a> Context<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        names: &'a NamespaceTree,
        scopes: &'a ScopeTree,
        diag: &'a Diagnostics,
    ) -> Self {
        Self {
            tree,
            names,
            scopes,
            diag,
        }
    }

    pub fn resolver(&self) -> Resolver<'a> {
        Resolver::new(self.tree, self.names, self.scopes, self.diag)
    }

    pub fn site(&self, node: NodeId) -> DeclSite {
        DeclSite {
            node,
            span: self.tree.span(node),
            file: self.tree.file_name(node),
        }
    }
}

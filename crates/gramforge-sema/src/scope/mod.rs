//! Lexical scopes and name resolution.
//!
//! Scopes are created once for the whole tree (global, file, package,
//! grammar, class) and then filled: local bindings during declaration
//! collection, imported bindings during import resolution.

mod resolve;
mod table;


pub use resolve::{ResolveError, ResolveMode, Resolution, Resolver};
pub use table::{Binding, Origin, Scope, ScopeId, ScopeTable, ScopeTree};

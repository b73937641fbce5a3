//! Positioned syntax tree handed over by the external parser.
//!
//! The tree is an arena: nodes refer to each other through [`NodeId`]s and
//! each node carries write-once slots that later phases fill in (enclosing
//! scope, declared namespace node, resolved reference, computed type).

mod builder;
mod node;
mod path;
mod span;
mod tree;


pub use builder::TreeBuilder;
pub use node::{NodeId, NodeKind, Quantifier, SyntaxNode};
pub use path::{Path, Segment};
pub use span::{Position, Span};
pub use tree::{Descendants, SyntaxTree};

//! gramforge: semantic analysis for a grammar-definition language.
//!
//! Input is a positioned syntax tree produced by an external parser
//! ([`syntax::SyntaxTree`]). The pipeline catalogs every declaration into a
//! [`namespace::NamespaceTree`], resolves every reference under lexical
//! scoping, import and extension rules, and reduces each non-terminal body
//! into an abstract grammar specification ([`ags`]) together with the named
//! captures visible to each embedded action.
//!
//! # Example
//!
//! ```
//! use gramforge_sema::Session;
//! use gramforge_sema::syntax::TreeBuilder;
//!
//! let mut b = TreeBuilder::new();
//! let x = b.lit("x");
//! let y = b.lit("y");
//! let z = b.lit("z");
//! let rhs = b.alts(vec![vec![x, y], vec![z]]);
//! let a = b.nonterm("A", rhs);
//! let g = b.grammar("G", &[], vec![a]);
//! b.file("g.gram", Some("demo"), vec![g]);
//!
//! let analyzed = Session::new(b.finish()).declare().resolve().analyze().unwrap();
//! assert!(analyzed.is_valid());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ags;
pub mod analyze;
pub mod diagnostics;
pub mod namespace;
pub mod pipeline;
pub mod scope;
pub mod syntax;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use pipeline::{AnalysisConfig, Analyzed, Declared, Resolved, Session};

/// Errors that abort an analysis run.
///
/// User mistakes in the analyzed grammar are never reported here; they
/// become [`Diagnostics`] and the pipeline keeps going.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Grammar body nested deeper than the configured recursion fuel.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("grammar analysis failed with {} errors", .0.error_count())]
    AnalysisFailed(Diagnostics),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

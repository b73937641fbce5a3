#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared primitives for the gramforge semantic core.
//!
//! - [`Interner`] turns identifiers into cheap [`Symbol`] handles.
//! - [`WriteOnce`] is a slot that may be filled exactly once; a second
//!   write is a programmer error and aborts.

mod interner;
mod invariants;
mod once;

#[cfg(test)]
mod interner_tests;

pub use interner::{Interner, Symbol};
pub use once::WriteOnce;

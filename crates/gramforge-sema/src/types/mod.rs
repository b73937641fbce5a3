//! Grammar-level types.
//!
//! Types are interned in a [`TypeTable`] and compared by [`TypeId`]. The
//! [`Lattice`] answers assignability and least-upper-bound questions,
//! delegating host-language types to a [`HostResolver`].

mod host;
mod lattice;
mod shape;
mod table;

#[cfg(test)]
mod lattice_tests;

pub use host::{HostResolver, HostType, NoHost, StaticHost};
pub use lattice::Lattice;
pub use shape::{TYPE_NONE, TypeId, TypeShape};
pub use table::TypeTable;

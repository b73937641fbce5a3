//! Named captures (labels) of grammar bodies.
//!
//! A walk over each non-terminal member tracks which labels are visible
//! where. Every action records the labels visible to it in a
//! [`Snapshot`]; the labels visible at the end of a member are the ones
//! the non-terminal exposes.

mod symbol;
mod table;
mod typing;

#[cfg(test)]
mod table_tests;
#[cfg(test)]
mod typing_tests;

pub use symbol::{AgsSymbol, SymbolArena, SymbolId, SymbolOrigin};
pub use table::{Snapshot, SymbolMap, collect_member_symbols, merge_members};
pub use typing::type_symbols;

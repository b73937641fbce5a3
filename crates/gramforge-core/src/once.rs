//! Write-once slots.
//!
//! Resolution results are attached to syntax and grammar nodes by later
//! phases. A slot starts empty, is filled by exactly one phase, and is
//! read-only afterwards. Filling it twice means two phases disagree about
//! who owns the slot, so it aborts instead of silently overwriting.

use std::fmt;
use std::sync::OnceLock;

use crate::invariants::write_once_violated;

/// A slot that may be set exactly once. Safe to share across threads.
pub struct WriteOnce<T> {
    cell: OnceLock<T>,
}

impl<T> WriteOnce<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Fill the slot.
    ///
    /// # Panics
    /// Panics if the slot was already set.
    #[track_caller]
    pub fn set(&self, value: T) {
        if self.cell.set(value).is_err() {
            write_once_violated(std::any::type_name::<T>());
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Copy> WriteOnce<T> {
    /// Copy the value out, if set.
    #[inline]
    pub fn copied(&self) -> Option<T> {
        self.cell.get().copied()
    }
}

impl<T> Default for WriteOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for WriteOnce<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("WriteOnce").field(value).finish(),
            None => f.write_str("WriteOnce(<unset>)"),
        }
    }
}

impl<T> From<T> for WriteOnce<T> {
    fn from(value: T) -> Self {
        Self {
            cell: OnceLock::from(value),
        }
    }
}

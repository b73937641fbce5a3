//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

#[inline]
pub(crate) fn ensure_own_symbol(entry: Option<&Box<str>>, raw: u32) -> &str {
    match entry {
        Some(s) => s,
        None => panic!("interner: symbol #{raw} was not created by this interner"),
    }
}

#[cold]
#[track_caller]
pub(crate) fn write_once_violated(type_name: &str) -> ! {
    panic!("write-once slot of `{type_name}` set twice (two phases claim the same slot)")
}

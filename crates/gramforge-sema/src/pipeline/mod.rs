//! Staged analysis pipeline.
//!
//! ```text
//! Session ──declare()──▶ Declared ──resolve()──▶ Resolved ──analyze()──▶ Analyzed
//! ```
//!
//! Each stage owns the previous one and dereferences to it, so accessors
//! of earlier stages stay available.

mod config;
mod stages;

#[cfg(test)]
mod stages_tests;

pub use config::AnalysisConfig;
pub use stages::{Analyzed, Declared, Resolved, Session};

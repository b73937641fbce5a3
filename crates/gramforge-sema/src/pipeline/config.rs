use serde::{Deserialize, Serialize};

const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// Knobs for one analysis run.
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum nesting depth of grammar bodies. Deeper input aborts with
    /// [`Error::RecursionLimitExceeded`](crate::Error::RecursionLimitExceeded).
    pub recursion_fuel: u32,
    /// Collect declarations of different files on separate threads.
    pub parallel_collect: bool,
    pub report_unused_imports: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recursion_fuel: DEFAULT_RECURSION_FUEL,
            parallel_collect: false,
            report_unused_imports: true,
        }
    }
}

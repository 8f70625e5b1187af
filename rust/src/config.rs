//! Configuration for the dependency engine.

use crate::logging::VERBOSITY_SILENT;

/// Knobs shared by every engine entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbosity: VERBOSITY_SILENT,
        }
    }
}

impl EngineConfig {
    pub fn with_verbosity(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

//! Critical path analysis.
//!
//! Tasks are unit length, so the critical path is the longest chain of
//! transitively dependent tasks. Due dates (falling back to creation time)
//! only feed the per-task earliest-start estimates.

mod calculation;
mod types;

pub use calculation::{
    analyze, analyze_with_config, compute_critical_path, compute_critical_path_with_config,
    CriticalPathError,
};
pub use types::{CriticalPathResult, TaskTiming};

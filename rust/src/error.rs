//! Error taxonomy shared by the write path and the read path.

use thiserror::Error;

use crate::critical_path::CriticalPathError;
use crate::cycle_guard::RejectReason;
use crate::models::TaskId;
use crate::topo_sort::SortError;

/// Errors surfaced to callers of the engine.
///
/// `CycleWouldForm` is a routine validation outcome on the write path.
/// `DataIntegrity` means the stored edge set is already corrupt and must not
/// be degraded to an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),
    #[error("Adding dependency {from} -> {to} would create a circular dependency")]
    CycleWouldForm { from: TaskId, to: TaskId },
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
    #[error("Dependency {from} -> {to} not found")]
    NotFound { from: TaskId, to: TaskId },
}

impl EngineError {
    /// Build the error for a rejected insertion of `from -> to`.
    pub fn from_rejection(reason: RejectReason, from: TaskId, to: TaskId) -> Self {
        match reason {
            RejectReason::SelfDependency => {
                EngineError::InvalidArgument(format!("task {from} cannot depend on itself"))
            }
            RejectReason::UnknownTask(id) => EngineError::UnknownTask(id),
            RejectReason::CycleWouldForm => EngineError::CycleWouldForm { from, to },
        }
    }
}

impl From<SortError> for EngineError {
    fn from(err: SortError) -> Self {
        EngineError::DataIntegrity(err.to_string())
    }
}

impl From<CriticalPathError> for EngineError {
    fn from(err: CriticalPathError) -> Self {
        EngineError::DataIntegrity(err.to_string())
    }
}

//! Task dependency engine.
//!
//! Tracks precedence between tasks and answers two questions: would adding a
//! dependency create a cycle, and what is the critical path (with per-task
//! earliest starts) of the current graph. The engine is a pure function of
//! the tasks and edges handed to it; the graph is rebuilt on every query.
//!
//! Write path: [`check_and_prepare_insert`] (or [`TaskGraphStore::add_dependency`],
//! which commits under the same lock). Read path: [`compute_critical_path`]
//! builds a [`Graph`], orders it with [`topo_sort::sort`] and runs
//! [`critical_path::analyze`].

pub mod config;
pub mod critical_path;
pub mod cycle_guard;
pub mod error;
pub mod graph;
pub mod index;
pub mod logging;
pub mod models;
pub mod store;
pub mod topo_sort;

#[cfg(feature = "python")]
mod python;

pub use config::EngineConfig;
pub use critical_path::{
    analyze, compute_critical_path, compute_critical_path_with_config, CriticalPathError,
    CriticalPathResult, TaskTiming,
};
pub use cycle_guard::{check_and_prepare_insert, would_create_cycle, InsertDecision, RejectReason};
pub use error::EngineError;
pub use graph::{list_dependencies_and_dependents, Graph, TaskNeighbors};
pub use models::{parse_due_date, parse_task_id, DependencyEdge, Task, TaskId};
pub use store::{Neighbors, TaskGraphStore};
pub use topo_sort::SortError;

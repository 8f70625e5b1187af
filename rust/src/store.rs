//! In-memory task and dependency store.
//!
//! Serves as the reference collaborator for the engine. All edge writes go
//! through one write lock, so the cycle check and the commit of a new edge
//! form a single serializable step per store. Reads take a snapshot under the
//! read lock and compute outside it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::EngineConfig;
use crate::critical_path::{compute_critical_path_with_config, CriticalPathResult};
use crate::cycle_guard::{check_insert_with, InsertDecision};
use crate::error::EngineError;
use crate::graph::list_dependencies_and_dependents;
use crate::log_changes;
use crate::models::{DependencyEdge, Task, TaskId};

/// Owned direct neighbors of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    pub dependencies: Vec<Task>,
    pub dependents: Vec<Task>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: BTreeMap<TaskId, Task>,
    edges: BTreeSet<DependencyEdge>,
}

impl StoreState {
    fn snapshot(&self) -> (Vec<Task>, Vec<DependencyEdge>) {
        (
            self.tasks.values().cloned().collect(),
            self.edges.iter().copied().collect(),
        )
    }
}

/// Thread-safe task graph store with a single writer lane.
#[derive(Debug, Default)]
pub struct TaskGraphStore {
    state: RwLock<StoreState>,
    config: EngineConfig,
}

impl TaskGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: RwLock::default(),
            config,
        }
    }

    // Every write leaves the state consistent, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new task. Ids must be unique.
    pub fn add_task(&self, task: Task) -> Result<(), EngineError> {
        let mut state = self.write();
        if state.tasks.contains_key(&task.id) {
            return Err(EngineError::InvalidArgument(format!(
                "task {} already exists",
                task.id
            )));
        }
        log_changes!(self.config.verbosity, task = task.id, "task added");
        state.tasks.insert(task.id, task);
        Ok(())
    }

    /// Remove a task together with every edge that names it.
    pub fn remove_task(&self, id: TaskId) -> Result<Task, EngineError> {
        let mut state = self.write();
        let task = state.tasks.remove(&id).ok_or(EngineError::UnknownTask(id))?;
        state.edges.retain(|e| e.from_id != id && e.to_id != id);
        log_changes!(self.config.verbosity, task = id, "task removed");
        Ok(task)
    }

    /// Validate and commit `from -> to` ("from depends on to") atomically.
    ///
    /// Re-adding an existing edge is accepted and leaves the set unchanged.
    pub fn add_dependency(&self, from: TaskId, to: TaskId) -> Result<DependencyEdge, EngineError> {
        let mut state = self.write();
        let edges: Vec<DependencyEdge> = state.edges.iter().copied().collect();

        let decision = check_insert_with(
            from,
            to,
            |id| state.tasks.contains_key(&id),
            &edges,
            &self.config,
        );
        let edge = decision.into_result(from, to)?;

        if state.edges.insert(edge) {
            log_changes!(self.config.verbosity, from, to, "dependency added");
        }
        Ok(edge)
    }

    /// Run the write-path check without committing.
    pub fn check_dependency(&self, from: TaskId, to: TaskId) -> InsertDecision {
        let state = self.read();
        let edges: Vec<DependencyEdge> = state.edges.iter().copied().collect();
        check_insert_with(
            from,
            to,
            |id| state.tasks.contains_key(&id),
            &edges,
            &self.config,
        )
    }

    /// Remove `from -> to`; `NotFound` if no such edge exists.
    pub fn remove_dependency(&self, from: TaskId, to: TaskId) -> Result<(), EngineError> {
        let mut state = self.write();
        if !state.edges.remove(&DependencyEdge::new(from, to)) {
            return Err(EngineError::NotFound { from, to });
        }
        log_changes!(self.config.verbosity, from, to, "dependency removed");
        Ok(())
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.read().tasks.get(&id).cloned()
    }

    /// All tasks, ascending by id.
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.values().cloned().collect()
    }

    /// All edges, ordered by `(from_id, to_id)`.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.read().edges.iter().copied().collect()
    }

    pub fn list_dependencies_and_dependents(&self, id: TaskId) -> Result<Neighbors, EngineError> {
        let (tasks, edges) = self.read().snapshot();
        let neighbors = list_dependencies_and_dependents(id, &tasks, &edges)?;
        Ok(Neighbors {
            dependencies: neighbors.dependencies.into_iter().cloned().collect(),
            dependents: neighbors.dependents.into_iter().cloned().collect(),
        })
    }

    /// Compute the critical path over a consistent snapshot of the store.
    pub fn compute_critical_path(&self) -> Result<CriticalPathResult, EngineError> {
        let (tasks, edges) = self.read().snapshot();
        compute_critical_path_with_config(&tasks, &edges, &self.config)
    }
}

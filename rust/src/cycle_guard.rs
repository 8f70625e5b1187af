//! Write-path validation for new dependency edges.
//!
//! Adding `from -> to` ("from depends on to") closes a cycle exactly when
//! `to` already depends on `from`, directly or transitively.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{DependencyEdge, Task, TaskId};
use crate::{log_changes, log_checks};

/// Why a candidate edge was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    SelfDependency,
    UnknownTask(TaskId),
    CycleWouldForm,
}

/// Outcome of validating a candidate edge against the current edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertDecision {
    Accept(DependencyEdge),
    Reject(RejectReason),
}

impl InsertDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InsertDecision::Accept(_))
    }

    /// Convert into a `Result`, mapping the rejection onto the error taxonomy.
    pub fn into_result(self, from: TaskId, to: TaskId) -> Result<DependencyEdge, EngineError> {
        match self {
            InsertDecision::Accept(edge) => Ok(edge),
            InsertDecision::Reject(reason) => Err(EngineError::from_rejection(reason, from, to)),
        }
    }
}

/// Would committing `from -> to` make the edge set cyclic?
///
/// Walks the depends-on relation from `to` with an explicit stack; the
/// visited set bounds the walk to O(V + E).
pub fn would_create_cycle(from: TaskId, to: TaskId, edges: &[DependencyEdge]) -> bool {
    if from == to {
        return true;
    }

    let mut depends_on: FxHashMap<TaskId, Vec<TaskId>> = FxHashMap::default();
    for edge in edges {
        depends_on.entry(edge.from_id).or_default().push(edge.to_id);
    }

    let mut visited: FxHashSet<TaskId> = FxHashSet::default();
    let mut stack: Vec<TaskId> = vec![to];

    while let Some(current) = stack.pop() {
        if current == from {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = depends_on.get(&current) {
            stack.extend(next.iter().filter(|id| !visited.contains(*id)));
        }
    }

    false
}

/// Validate a candidate edge before it is committed.
///
/// Cheap checks run first (self-dependency, unknown endpoints); the graph
/// walk only runs for well-formed candidates. The caller must commit the
/// accepted edge under the same lock or transaction that supplied `edges`.
pub fn check_and_prepare_insert(
    from: TaskId,
    to: TaskId,
    tasks: &[Task],
    edges: &[DependencyEdge],
) -> InsertDecision {
    let known: FxHashSet<TaskId> = tasks.iter().map(|t| t.id).collect();
    check_insert_with(
        from,
        to,
        |id| known.contains(&id),
        edges,
        &EngineConfig::default(),
    )
}

pub(crate) fn check_insert_with(
    from: TaskId,
    to: TaskId,
    is_known: impl Fn(TaskId) -> bool,
    edges: &[DependencyEdge],
    config: &EngineConfig,
) -> InsertDecision {
    if from == to {
        return InsertDecision::Reject(RejectReason::SelfDependency);
    }
    for id in [from, to] {
        if !is_known(id) {
            return InsertDecision::Reject(RejectReason::UnknownTask(id));
        }
    }

    log_checks!(config.verbosity, from, to, "checking candidate dependency");

    if would_create_cycle(from, to, edges) {
        log_changes!(config.verbosity, from, to, "rejected: dependency would form a cycle");
        return InsertDecision::Reject(RejectReason::CycleWouldForm);
    }

    InsertDecision::Accept(DependencyEdge::new(from, to))
}

//! Types for critical path analysis.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::graph::Graph;
use crate::models::{Task, TaskId};

/// Per-task result of the forward pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTiming {
    /// Number of tasks in the longest dependency chain ending at this task.
    pub chain_length: usize,
    /// Dependency that realizes `chain_length`, if any.
    pub predecessor: Option<TaskId>,
    /// Due date, or creation time when no due date is set.
    pub finish_time: DateTime<Utc>,
    /// Latest finish time among direct dependencies; `None` for roots.
    pub earliest_start: Option<DateTime<Utc>>,
}

/// Result of a critical path query. Covers every task in the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPathResult {
    /// Longest dependency chain, root first.
    pub critical_path: Vec<TaskId>,
    /// Earliest start for every task.
    pub earliest_start: BTreeMap<TaskId, Option<DateTime<Utc>>>,
    /// Full timing for every task.
    pub task_timings: BTreeMap<TaskId, TaskTiming>,
}

impl CriticalPathResult {
    pub fn critical_path_length(&self) -> usize {
        self.critical_path.len()
    }

    /// Chain of ids realizing `id`'s chain length, root first.
    pub fn chain_path(&self, id: TaskId) -> Option<Vec<TaskId>> {
        let timing = self.task_timings.get(&id)?;
        let mut path = Vec::with_capacity(timing.chain_length);
        let mut current = Some(id);

        // Predecessors strictly shrink chain_length, so this walk is bounded.
        while let Some(cur) = current {
            if path.len() >= timing.chain_length {
                break;
            }
            path.push(cur);
            current = self.task_timings.get(&cur).and_then(|t| t.predecessor);
        }

        path.reverse();
        Some(path)
    }

    /// Earliest starts keyed by stringified id, as millisecond UTC ISO-8601 strings.
    pub fn earliest_start_iso(&self) -> BTreeMap<String, Option<String>> {
        self.earliest_start
            .iter()
            .map(|(id, start)| {
                (
                    id.to_string(),
                    start.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
                )
            })
            .collect()
    }

    /// Resolve the critical path to the tasks it names.
    pub fn critical_path_tasks<'a>(&self, graph: &Graph<'a>) -> Vec<&'a Task> {
        self.critical_path
            .iter()
            .filter_map(|&id| graph.task_by_id(id))
            .collect()
    }
}

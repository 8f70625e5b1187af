//! Critical path calculation over a topologically ordered task graph.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::Graph;
use crate::index::NodeIdx;
use crate::models::{DependencyEdge, Task, TaskId};
use crate::topo_sort::sort_with_config;
use crate::{log_changes, log_debug};

use super::types::{CriticalPathResult, TaskTiming};

/// Error types for critical path calculation.
///
/// All of these mean the supplied order does not match the graph; none is
/// recoverable by skipping the offending task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriticalPathError {
    #[error("Dependency {dependency} of task {task} has no result yet")]
    MissingDependencyResult { task: TaskId, dependency: TaskId },
    #[error("Task {0} in the order is not part of the graph")]
    UnknownTask(TaskId),
    #[error("Task {0} appears more than once in the order")]
    DuplicateTask(TaskId),
    #[error("Order covers {ordered} of {total} tasks")]
    IncompleteOrder { ordered: usize, total: usize },
}

/// Compute the critical path and per-task earliest starts.
///
/// Rebuilds the graph from the supplied tasks and edges, orders it, then
/// analyzes it. A cyclic edge set fails with `DataIntegrity`; no partial
/// result is ever returned.
pub fn compute_critical_path(
    tasks: &[Task],
    edges: &[DependencyEdge],
) -> Result<CriticalPathResult, EngineError> {
    compute_critical_path_with_config(tasks, edges, &EngineConfig::default())
}

pub fn compute_critical_path_with_config(
    tasks: &[Task],
    edges: &[DependencyEdge],
    config: &EngineConfig,
) -> Result<CriticalPathResult, EngineError> {
    let graph = Graph::build_with_config(tasks, edges, config);
    let order = sort_with_config(&graph, config)?;
    Ok(analyze_with_config(&graph, &order, config)?)
}

/// Analyze a graph given a topological order of its task ids.
pub fn analyze(graph: &Graph<'_>, order: &[TaskId]) -> Result<CriticalPathResult, CriticalPathError> {
    analyze_with_config(graph, order, &EngineConfig::default())
}

/// Forward pass in topological order.
///
/// For each task: `chain_length` is one more than the longest dependency
/// chain (first dependency in ascending id wins ties); `earliest_start` is
/// the latest dependency finish time. The critical path ends at the task
/// with the greatest `chain_length`, lowest id on ties.
pub fn analyze_with_config(
    graph: &Graph<'_>,
    order: &[TaskId],
    config: &EngineConfig,
) -> Result<CriticalPathResult, CriticalPathError> {
    let n = graph.len();
    let index = graph.index();
    let ids = index.ids();

    let mut timings: Vec<Option<TaskTiming>> = vec![None; n];

    for &task_id in order {
        let idx = index
            .get_idx(task_id)
            .ok_or(CriticalPathError::UnknownTask(task_id))?;
        let task = graph
            .task(idx)
            .ok_or(CriticalPathError::UnknownTask(task_id))?;
        if timings[idx as usize].is_some() {
            return Err(CriticalPathError::DuplicateTask(task_id));
        }

        let mut longest: Option<(usize, NodeIdx)> = None;
        let mut earliest_start: Option<DateTime<Utc>> = None;

        for &dep in graph.dependencies(idx) {
            let dep_timing = timings[dep as usize].as_ref().ok_or(
                CriticalPathError::MissingDependencyResult {
                    task: task_id,
                    dependency: ids[dep as usize],
                },
            )?;

            if longest.map_or(true, |(len, _)| dep_timing.chain_length > len) {
                longest = Some((dep_timing.chain_length, dep));
            }
            if earliest_start.map_or(true, |start| dep_timing.finish_time > start) {
                earliest_start = Some(dep_timing.finish_time);
            }
        }

        let timing = TaskTiming {
            chain_length: longest.map_or(1, |(len, _)| len + 1),
            predecessor: longest.map(|(_, dep)| ids[dep as usize]),
            finish_time: task.finish_time(),
            earliest_start,
        };

        log_debug!(
            config.verbosity,
            task = task_id,
            chain_length = timing.chain_length,
            predecessor = ?timing.predecessor,
            earliest_start = ?timing.earliest_start,
            "analyzed task"
        );

        timings[idx as usize] = Some(timing);
    }

    let ordered = timings.iter().filter(|t| t.is_some()).count();
    if ordered != n {
        return Err(CriticalPathError::IncompleteOrder { ordered, total: n });
    }

    let mut result = CriticalPathResult::default();
    let mut end: Option<(usize, TaskId)> = None;

    // Ascending index is ascending id, so strict comparison keeps the lowest id.
    for (idx, timing) in timings.into_iter().enumerate() {
        let Some(timing) = timing else {
            continue;
        };
        let task_id = ids[idx];
        if end.map_or(true, |(len, _)| timing.chain_length > len) {
            end = Some((timing.chain_length, task_id));
        }
        result.earliest_start.insert(task_id, timing.earliest_start);
        result.task_timings.insert(task_id, timing);
    }

    if let Some((_, end_id)) = end {
        result.critical_path = result.chain_path(end_id).unwrap_or_default();
    }

    log_changes!(
        config.verbosity,
        critical_path = ?result.critical_path,
        tasks = n,
        "critical path computed"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topo_sort::sort;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn make_task(id: TaskId, created_at: DateTime<Utc>, due: Option<DateTime<Utc>>) -> Task {
        Task::new(id, format!("task {id}"), created_at)
            .unwrap()
            .with_due_date(due)
    }

    fn edge(from: TaskId, to: TaskId) -> DependencyEdge {
        DependencyEdge::new(from, to)
    }

    #[test]
    fn test_chain_scenario() {
        // A (due Jan 10) <- B (created Jan 1, no due) <- C (no due)
        let tasks = vec![
            make_task(1, ts(2023, 12, 1), Some(ts(2024, 1, 10))),
            make_task(2, ts(2024, 1, 1), None),
            make_task(3, ts(2024, 1, 2), None),
        ];
        let edges = [edge(2, 1), edge(3, 2)];

        let graph = Graph::build(&tasks, &edges);
        let order = sort(&graph).unwrap();
        assert_eq!(order, vec![1, 2, 3]);

        let result = analyze(&graph, &order).unwrap();
        assert_eq!(result.critical_path, vec![1, 2, 3]);
        assert_eq!(result.earliest_start[&1], None);
        assert_eq!(result.earliest_start[&2], Some(ts(2024, 1, 10)));
        assert_eq!(result.earliest_start[&3], Some(ts(2024, 1, 1)));
        assert_eq!(
            result.earliest_start_iso().get("2"),
            Some(&Some("2024-01-10T00:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn test_root_has_no_earliest_start() {
        let tasks = vec![make_task(1, ts(2024, 1, 1), None)];
        let result = compute_critical_path(&tasks, &[]).unwrap();

        assert_eq!(result.critical_path, vec![1]);
        assert_eq!(result.task_timings[&1].chain_length, 1);
        assert_eq!(result.earliest_start[&1], None);
    }

    #[test]
    fn test_earliest_start_is_latest_dependency_finish() {
        // 3 depends on 1 (due Feb 1) and 2 (due Mar 1)
        let tasks = vec![
            make_task(1, ts(2024, 1, 1), Some(ts(2024, 2, 1))),
            make_task(2, ts(2024, 1, 1), Some(ts(2024, 3, 1))),
            make_task(3, ts(2024, 1, 1), None),
        ];
        let result = compute_critical_path(&tasks, &[edge(3, 1), edge(3, 2)]).unwrap();

        assert_eq!(result.earliest_start[&3], Some(ts(2024, 3, 1)));
        assert_eq!(result.task_timings[&3].chain_length, 2);
    }

    #[test]
    fn test_chain_ties_prefer_lowest_dependency() {
        // 3 depends on 1 and 2, both chain length 1
        let tasks = vec![
            make_task(1, ts(2024, 1, 1), None),
            make_task(2, ts(2024, 1, 1), None),
            make_task(3, ts(2024, 1, 1), None),
        ];
        let result = compute_critical_path(&tasks, &[edge(3, 2), edge(3, 1)]).unwrap();

        assert_eq!(result.task_timings[&3].predecessor, Some(1));
        assert_eq!(result.critical_path, vec![1, 3]);
    }

    #[test]
    fn test_global_ties_prefer_lowest_end_task() {
        // two disjoint chains of length 2: 1 <- 2 and 3 <- 4
        let tasks: Vec<Task> = (1..=4).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let result = compute_critical_path(&tasks, &[edge(4, 3), edge(2, 1)]).unwrap();

        assert_eq!(result.critical_path, vec![1, 2]);
    }

    #[test]
    fn test_longest_branch_wins() {
        // 5 <- 4 <- 3 <- 1 and 5 <- 2 <- 1
        let tasks: Vec<Task> = (1..=5).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let edges = [edge(2, 1), edge(3, 1), edge(4, 3), edge(5, 4), edge(5, 2)];
        let result = compute_critical_path(&tasks, &edges).unwrap();

        assert_eq!(result.critical_path, vec![1, 3, 4, 5]);
        assert_eq!(result.critical_path_length(), 4);
        assert_eq!(result.chain_path(2), Some(vec![1, 2]));
    }

    #[test]
    fn test_every_task_has_earliest_start() {
        let tasks: Vec<Task> = (1..=6).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let result = compute_critical_path(&tasks, &[edge(2, 1), edge(6, 5)]).unwrap();

        assert_eq!(result.earliest_start.len(), 6);
        assert_eq!(result.task_timings.len(), 6);
    }

    #[test]
    fn test_cycle_is_data_integrity() {
        let tasks: Vec<Task> = (1..=3).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let result = compute_critical_path(&tasks, &[edge(1, 2), edge(2, 3), edge(3, 1)]);

        assert!(matches!(result, Err(EngineError::DataIntegrity(_))));
    }

    #[test]
    fn test_stale_edges_ignored() {
        let tasks: Vec<Task> = (1..=2).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let result = compute_critical_path(&tasks, &[edge(2, 1), edge(2, 77)]).unwrap();

        assert_eq!(result.critical_path, vec![1, 2]);
    }

    #[test]
    fn test_empty_input() {
        let result = compute_critical_path(&[], &[]).unwrap();
        assert!(result.critical_path.is_empty());
        assert!(result.earliest_start.is_empty());
    }

    #[test]
    fn test_missing_dependency_result_is_fatal() {
        let tasks: Vec<Task> = (1..=2).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let graph = Graph::build(&tasks, &[edge(2, 1)]);

        assert_eq!(
            analyze(&graph, &[2, 1]),
            Err(CriticalPathError::MissingDependencyResult {
                task: 2,
                dependency: 1
            })
        );
    }

    #[test]
    fn test_bad_orders_rejected() {
        let tasks: Vec<Task> = (1..=2).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let graph = Graph::build(&tasks, &[]);

        assert_eq!(
            analyze(&graph, &[1]),
            Err(CriticalPathError::IncompleteOrder {
                ordered: 1,
                total: 2
            })
        );
        assert_eq!(
            analyze(&graph, &[1, 1, 2]),
            Err(CriticalPathError::DuplicateTask(1))
        );
        assert_eq!(
            analyze(&graph, &[1, 9]),
            Err(CriticalPathError::UnknownTask(9))
        );
    }

    #[test]
    fn test_idempotent() {
        let tasks: Vec<Task> = (1..=4).map(|id| make_task(id, ts(2024, 1, id as u32), None)).collect();
        let edges = [edge(2, 1), edge(3, 1), edge(4, 3)];

        assert_eq!(
            compute_critical_path(&tasks, &edges).unwrap(),
            compute_critical_path(&tasks, &edges).unwrap()
        );
    }

    #[test]
    fn test_critical_path_tasks_resolve() {
        let tasks: Vec<Task> = (1..=2).map(|id| make_task(id, ts(2024, 1, 1), None)).collect();
        let edges = [edge(2, 1)];
        let graph = Graph::build(&tasks, &edges);
        let result = analyze(&graph, &sort(&graph).unwrap()).unwrap();

        let titles: Vec<&str> = result
            .critical_path_tasks(&graph)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["task 1", "task 2"]);
    }
}

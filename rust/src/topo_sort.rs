//! Topological ordering of the task graph (Kahn's algorithm).

use std::collections::VecDeque;

use thiserror::Error;

use crate::config::EngineConfig;
use crate::graph::Graph;
use crate::index::NodeIdx;
use crate::log_changes;
use crate::models::TaskId;

/// Errors from topological sorting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The edge set contains a cycle; only `sorted` of `total` tasks could be ordered.
    #[error("Circular dependency detected in task graph ({sorted} of {total} tasks ordered)")]
    CircularDependency { sorted: usize, total: usize },
}

/// Order task ids so every task follows all of its dependencies.
pub fn sort(graph: &Graph<'_>) -> Result<Vec<TaskId>, SortError> {
    sort_with_config(graph, &EngineConfig::default())
}

pub fn sort_with_config(graph: &Graph<'_>, config: &EngineConfig) -> Result<Vec<TaskId>, SortError> {
    let order = topological_sort_vec(graph, config)?;
    Ok(graph.resolve_ids(&order))
}

/// Kahn's algorithm over arena indices.
///
/// In-degree is the number of unresolved dependencies. The queue is seeded
/// with roots in ascending id and dependents are released in ascending id, so
/// the order is reproducible for a given input.
pub(crate) fn topological_sort_vec(
    graph: &Graph<'_>,
    config: &EngineConfig,
) -> Result<Vec<NodeIdx>, SortError> {
    let n = graph.len();

    let mut in_degree: Vec<usize> = (0..n as NodeIdx)
        .map(|idx| graph.dependencies(idx).len())
        .collect();

    let mut queue: VecDeque<NodeIdx> = (0..n as NodeIdx)
        .filter(|&idx| in_degree[idx as usize] == 0)
        .collect();

    let mut result: Vec<NodeIdx> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        result.push(idx);

        for &dependent in graph.dependents(idx) {
            let degree = &mut in_degree[dependent as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if result.len() != n {
        let stuck: Vec<NodeIdx> = (0..n as NodeIdx)
            .filter(|&idx| in_degree[idx as usize] > 0)
            .collect();
        log_changes!(
            config.verbosity,
            sorted = result.len(),
            total = n,
            unresolved = ?graph.resolve_ids(&stuck),
            "topological sort left tasks unresolved"
        );
        return Err(SortError::CircularDependency {
            sorted: result.len(),
            total: n,
        });
    }

    Ok(result)
}

//! In-memory task graph built fresh for every query.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::index::{NodeIdx, TaskIndex};
use crate::log_checks;
use crate::models::{DependencyEdge, Task, TaskId};

/// Immutable task graph for a single query.
///
/// Tasks live in an arena addressed by `NodeIdx` (ascending task id order).
/// Adjacency lists are sorted and deduplicated, so iteration order is stable
/// and parallel edges collapse to one.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    index: TaskIndex,
    tasks: Vec<&'a Task>,
    /// `deps[i]`: nodes that node `i` depends on.
    deps: Vec<Vec<NodeIdx>>,
    /// `dependents[i]`: nodes that depend on node `i`.
    dependents: Vec<Vec<NodeIdx>>,
    stale_edges: usize,
}

impl<'a> Graph<'a> {
    /// Build a graph from the current tasks and edges.
    ///
    /// Edges naming a task that is not in `tasks` are skipped; tasks may be
    /// deleted out of band, so this is not an error. If two tasks share an id
    /// the first one wins.
    pub fn build(tasks: &'a [Task], edges: &[DependencyEdge]) -> Self {
        Self::build_with_config(tasks, edges, &EngineConfig::default())
    }

    pub fn build_with_config(
        tasks: &'a [Task],
        edges: &[DependencyEdge],
        config: &EngineConfig,
    ) -> Self {
        let index = TaskIndex::new(tasks.iter().map(|t| t.id));
        let n = index.len();

        let mut slots: Vec<Option<&'a Task>> = vec![None; n];
        for task in tasks {
            if let Some(idx) = index.get_idx(task.id) {
                slots[idx as usize].get_or_insert(task);
            }
        }
        // Every indexed id came from `tasks`, so every slot is filled.
        let tasks: Vec<&'a Task> = slots.into_iter().flatten().collect();

        let mut deps: Vec<Vec<NodeIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<NodeIdx>> = vec![Vec::new(); n];
        let mut stale_edges = 0;

        for edge in edges {
            match (index.get_idx(edge.from_id), index.get_idx(edge.to_id)) {
                (Some(from), Some(to)) => {
                    deps[from as usize].push(to);
                    dependents[to as usize].push(from);
                }
                _ => {
                    stale_edges += 1;
                    log_checks!(
                        config.verbosity,
                        from = edge.from_id,
                        to = edge.to_id,
                        "skipping edge with unknown endpoint"
                    );
                }
            }
        }

        for list in deps.iter_mut().chain(dependents.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            index,
            tasks,
            deps,
            dependents,
            stale_edges,
        }
    }

    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of supplied edges that were dropped for naming unknown tasks.
    pub fn stale_edges(&self) -> usize {
        self.stale_edges
    }

    #[inline]
    pub fn task(&self, idx: NodeIdx) -> Option<&'a Task> {
        self.tasks.get(idx as usize).copied()
    }

    pub fn task_by_id(&self, id: TaskId) -> Option<&'a Task> {
        self.index.get_idx(id).and_then(|idx| self.task(idx))
    }

    /// Direct dependencies of a node, ascending.
    #[inline]
    pub fn dependencies(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.deps.get(idx as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct dependents of a node, ascending.
    #[inline]
    pub fn dependents(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.dependents.get(idx as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of the tasks `id` directly depends on. `None` if `id` is unknown.
    pub fn dependency_ids(&self, id: TaskId) -> Option<Vec<TaskId>> {
        let idx = self.index.get_idx(id)?;
        Some(self.resolve_ids(self.dependencies(idx)))
    }

    /// Ids of the tasks that directly depend on `id`. `None` if `id` is unknown.
    pub fn dependent_ids(&self, id: TaskId) -> Option<Vec<TaskId>> {
        let idx = self.index.get_idx(id)?;
        Some(self.resolve_ids(self.dependents(idx)))
    }

    pub(crate) fn resolve_ids(&self, nodes: &[NodeIdx]) -> Vec<TaskId> {
        nodes
            .iter()
            .filter_map(|&idx| self.index.get_id(idx))
            .collect()
    }

    fn resolve_tasks(&self, nodes: &[NodeIdx]) -> Vec<&'a Task> {
        nodes.iter().filter_map(|&idx| self.task(idx)).collect()
    }
}

/// Direct (non-transitive) neighbors of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNeighbors<'a> {
    /// Tasks the queried task depends on.
    pub dependencies: Vec<&'a Task>,
    /// Tasks that depend on the queried task.
    pub dependents: Vec<&'a Task>,
}

/// List the direct dependencies and dependents of `task_id`, ascending by id.
pub fn list_dependencies_and_dependents<'a>(
    task_id: TaskId,
    tasks: &'a [Task],
    edges: &[DependencyEdge],
) -> Result<TaskNeighbors<'a>, EngineError> {
    let graph = Graph::build(tasks, edges);
    let idx = graph
        .index()
        .get_idx(task_id)
        .ok_or(EngineError::UnknownTask(task_id))?;

    Ok(TaskNeighbors {
        dependencies: graph.resolve_tasks(graph.dependencies(idx)),
        dependents: graph.resolve_tasks(graph.dependents(idx)),
    })
}

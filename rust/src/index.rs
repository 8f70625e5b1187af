//! Dense node indexing for the graph arena.
//!
//! Maps sparse persisted task ids to contiguous `NodeIdx` values so per-task
//! data can live in plain vectors.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Dense arena index (u32 for compact storage and fast hashing).
pub type NodeIdx = u32;

/// Bidirectional `TaskId <-> NodeIdx` mapping.
///
/// Indices are assigned in ascending id order, so iterating `0..len()` visits
/// tasks by ascending id.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    to_idx: FxHashMap<TaskId, NodeIdx>,
    from_idx: Vec<TaskId>,
}

impl TaskIndex {
    /// Build an index from ids; duplicates keep their first slot.
    pub fn new(ids: impl IntoIterator<Item = TaskId>) -> Self {
        let mut sorted: Vec<TaskId> = ids.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let to_idx = sorted
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx as NodeIdx))
            .collect();

        Self {
            to_idx,
            from_idx: sorted,
        }
    }

    #[inline]
    pub fn get_idx(&self, id: TaskId) -> Option<NodeIdx> {
        self.to_idx.get(&id).copied()
    }

    #[inline]
    pub fn get_id(&self, idx: NodeIdx) -> Option<TaskId> {
        self.from_idx.get(idx as usize).copied()
    }

    #[inline]
    pub fn contains(&self, id: TaskId) -> bool {
        self.to_idx.contains_key(&id)
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> &[TaskId] {
        &self.from_idx
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

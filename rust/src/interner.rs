//! Activity id interning.
//!
//! Activities get dense `u32` indices in plan order so the passes can keep
//! their per-activity state in plain vectors. Lookups by string resolve to the
//! first activity carrying that id.

use rustc_hash::FxHashMap;

/// Position of an activity in the plan.
pub type ActivityIdx = u32;

#[derive(Debug, Clone, Default)]
pub struct ActivityIndex {
    by_id: FxHashMap<String, ActivityIdx>,
    ids: Vec<String>,
}

impl ActivityIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Append the next activity id.
    ///
    /// Returns its index and whether the id was new. A repeated id still gets
    /// its own index, but lookups keep resolving to the first occurrence.
    pub fn push(&mut self, id: &str) -> (ActivityIdx, bool) {
        let idx = self.ids.len() as ActivityIdx;
        self.ids.push(id.to_string());
        let fresh = !self.by_id.contains_key(id);
        if fresh {
            self.by_id.insert(id.to_string(), idx);
        }
        (idx, fresh)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<ActivityIdx> {
        self.by_id.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: ActivityIdx) -> Option<&str> {
        self.ids.get(idx as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

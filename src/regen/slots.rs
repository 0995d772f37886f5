//! Dense slot table for per-agent state
//!
//! Live records occupy `[0, live)` with no holes, so a tick is a straight walk
//! over a contiguous slice. Removing an agent moves the last live record into
//! the vacated slot; the tail `[live, capacity)` is the free region that new
//! agents fill before the table grows. Growth doubles the capacity.

use ahash::AHashMap;

use super::state::RegenState;
use crate::core::types::AgentId;

#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<RegenState>,
    capacity: usize,
    index: AHashMap<AgentId, usize>,
}

impl SlotTable {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots reserved, live or free
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.index.contains_key(&agent)
    }

    pub fn index_of(&self, agent: AgentId) -> Option<usize> {
        self.index.get(&agent).copied()
    }

    pub fn get(&self, agent: AgentId) -> Option<&RegenState> {
        self.index_of(agent).map(|i| &self.slots[i])
    }

    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut RegenState> {
        let i = self.index_of(agent)?;
        Some(&mut self.slots[i])
    }

    /// Insert a record into the first free slot, growing if there is none
    ///
    /// Returns the slot index, or `None` if the agent is already tracked.
    pub fn insert(&mut self, state: RegenState) -> Option<usize> {
        let agent = state.agent();
        if self.index.contains_key(&agent) {
            return None;
        }

        if self.slots.len() == self.capacity {
            self.capacity *= 2;
            self.slots.reserve_exact(self.capacity - self.slots.len());
            let extra = self.capacity - self.index.len();
            self.index.reserve(extra);
        }

        let slot = self.slots.len();
        self.slots.push(state);
        self.index.insert(agent, slot);
        Some(slot)
    }

    /// Remove an agent's record, filling the hole with the last live record
    pub fn remove(&mut self, agent: AgentId) -> Option<RegenState> {
        let slot = self.index.remove(&agent)?;
        let removed = self.slots.swap_remove(slot);
        if let Some(moved) = self.slots.get(slot) {
            self.index.insert(moved.agent(), slot);
        }
        Some(removed)
    }

    /// Drop every record; capacity is kept
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    pub fn live(&self) -> &[RegenState] {
        &self.slots
    }

    pub fn live_mut(&mut self) -> &mut [RegenState] {
        &mut self.slots
    }
}

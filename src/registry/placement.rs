use std::collections::HashMap;

use super::types::{AgentId, WorkerId};

/// Agent 放置目录：AgentId -> 当前承载它的 Worker
///
/// At most one worker is ever recorded per AgentId. Bindings are created
/// lazily by `get_or_place` in the registry and dropped when the bound
/// worker is purged, which returns the AgentId to the unplaced state.
#[derive(Debug, Default)]
pub struct PlacementDirectory {
    bindings: HashMap<AgentId, WorkerId>,
}

impl PlacementDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, agent_id: &AgentId) -> Option<&WorkerId> {
        self.bindings.get(agent_id)
    }

    pub fn place(&mut self, agent_id: AgentId, worker: WorkerId) {
        self.bindings.insert(agent_id, worker);
    }

    pub fn remove(&mut self, agent_id: &AgentId) -> Option<WorkerId> {
        self.bindings.remove(agent_id)
    }

    /// Drops every binding pointing at `worker`; the affected AgentIds
    /// become eligible for re-placement on next access.
    pub fn remove_worker(&mut self, worker: &WorkerId) -> Vec<AgentId> {
        let evicted: Vec<AgentId> = self
            .bindings
            .iter()
            .filter(|(_, bound)| *bound == worker)
            .map(|(agent_id, _)| agent_id.clone())
            .collect();
        for agent_id in &evicted {
            self.bindings.remove(agent_id);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &WorkerId)> {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_worker_evicts_only_its_bindings() {
        let mut placements = PlacementDirectory::new();
        placements.place(AgentId::new("greeter", "a"), WorkerId::from("w1"));
        placements.place(AgentId::new("greeter", "b"), WorkerId::from("w2"));
        placements.place(AgentId::new("editor", "a"), WorkerId::from("w1"));

        let mut evicted = placements.remove_worker(&WorkerId::from("w1"));
        evicted.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        assert_eq!(
            evicted,
            vec![AgentId::new("editor", "a"), AgentId::new("greeter", "a")]
        );
        assert_eq!(placements.len(), 1);
        assert_eq!(
            placements.get(&AgentId::new("greeter", "b")),
            Some(&WorkerId::from("w2"))
        );
    }
}

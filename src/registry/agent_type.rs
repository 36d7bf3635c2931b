use std::collections::{BTreeSet, HashMap};

use rand::seq::IteratorRandom;

use super::types::WorkerId;

/// Agent 类型注册表：类型名 -> 提供该类型的 Worker 集合
///
/// Random choice over the set is the placement tie-break: it spreads load
/// without requiring any load telemetry from the workers.
#[derive(Debug, Default)]
pub struct AgentTypeRegistry {
    workers_by_type: HashMap<String, BTreeSet<WorkerId>>,
}

impl AgentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(&mut self, agent_type: &str, worker: WorkerId) {
        self.workers_by_type
            .entry(agent_type.to_string())
            .or_default()
            .insert(worker);
    }

    /// Removes `worker` from the type's set; prunes the entry once empty.
    pub fn unregister_type(&mut self, agent_type: &str, worker: &WorkerId) {
        if let Some(workers) = self.workers_by_type.get_mut(agent_type) {
            workers.remove(worker);
            if workers.is_empty() {
                self.workers_by_type.remove(agent_type);
            }
        }
    }

    /// Uniformly-random worker offering `agent_type`, or `None` if the type
    /// is unsupported anywhere.
    pub fn compatible_worker(&self, agent_type: &str) -> Option<WorkerId> {
        let workers = self.workers_by_type.get(agent_type)?;
        workers.iter().choose(&mut rand::thread_rng()).cloned()
    }

    pub fn supports(&self, agent_type: &str) -> bool {
        self.workers_by_type.contains_key(agent_type)
    }

    pub fn workers_for(&self, agent_type: &str) -> Option<&BTreeSet<WorkerId>> {
        self.workers_by_type.get(agent_type)
    }

    pub fn agent_types(&self) -> impl Iterator<Item = &str> {
        self.workers_by_type.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_type_entry_is_pruned() {
        let mut registry = AgentTypeRegistry::new();
        registry.register_type("greeter", WorkerId::from("w1"));
        registry.unregister_type("greeter", &WorkerId::from("w1"));
        assert!(!registry.supports("greeter"));
        assert!(registry.compatible_worker("greeter").is_none());
    }

    #[test]
    fn register_type_is_idempotent() {
        let mut registry = AgentTypeRegistry::new();
        registry.register_type("greeter", WorkerId::from("w1"));
        registry.register_type("greeter", WorkerId::from("w1"));
        assert_eq!(registry.workers_for("greeter").unwrap().len(), 1);
    }
}

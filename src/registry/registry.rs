use std::collections::BTreeSet;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{AgentMeshError, Result};

use super::agent_type::AgentTypeRegistry;
use super::placement::PlacementDirectory;
use super::subscription::SubscriptionTable;
use super::types::{AgentId, Subscription, SubscriptionEntry, WorkerId};
use super::worker::WorkerDirectory;

/// 注册表：四张表的唯一所有者
///
/// One lock guards the worker directory, the agent type registry, the
/// subscription table, and the placement directory together, so every
/// mutation observes and produces a consistent cross-table state. Callers
/// share the registry behind an `Arc` and go through `&self` methods; no
/// table is reachable from outside without the lock.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    config: RegistryConfig,
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    workers: WorkerDirectory,
    agent_types: AgentTypeRegistry,
    subscriptions: SubscriptionTable,
    placements: PlacementDirectory,
}

impl AgentRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RegistryState::default()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers (or re-registers) a worker with the agent types it can
    /// instantiate. Idempotent: repeated calls merge types and refresh the
    /// liveness timestamp.
    pub fn register_worker<I, S>(&self, worker: WorkerId, supported_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported: BTreeSet<String> = supported_types.into_iter().map(Into::into).collect();
        let mut state = self.state.write();
        for agent_type in &supported {
            state.agent_types.register_type(agent_type, worker.clone());
        }
        state.workers.register(worker.clone(), supported);
        debug!(worker = %worker, "worker registered");
    }

    /// Refreshes a worker's liveness timestamp. Silently ignored for
    /// unknown workers; such a caller should re-register.
    pub fn heartbeat(&self, worker: &WorkerId) {
        let mut state = self.state.write();
        if !state.workers.heartbeat(worker) {
            debug!(worker = %worker, "heartbeat from unknown worker ignored");
        }
    }

    /// Removes a worker, its agent type offerings, and every placement
    /// bound to it.
    pub fn unregister_worker(&self, worker: &WorkerId) {
        let mut state = self.state.write();
        remove_worker(&mut state, worker);
    }

    /// Purges every worker whose last heartbeat exceeds the configured
    /// timeout. Returns the purged worker ids. This is the sole
    /// liveness-failure path: a purged worker's agents re-place lazily on
    /// next access.
    pub fn sweep(&self) -> Vec<WorkerId> {
        let mut state = self.state.write();
        let stale = state
            .workers
            .expired(Instant::now(), self.config.worker_timeout);
        for worker in &stale {
            warn!(worker = %worker, "worker heartbeat timed out, purging");
            remove_worker(&mut state, worker);
        }
        stale
    }

    pub fn subscribe(&self, subscription: Subscription) -> String {
        let mut state = self.state.write();
        let id = state.subscriptions.subscribe(subscription);
        debug!(subscription = %id, "subscription added");
        id
    }

    pub fn unsubscribe(&self, id: &str) -> Result<()> {
        let mut state = self.state.write();
        state.subscriptions.unsubscribe(id)?;
        debug!(subscription = %id, "subscription removed");
        Ok(())
    }

    pub fn resolve_agent_types(&self, topic: &str, event_type: &str) -> BTreeSet<String> {
        self.state
            .read()
            .subscriptions
            .resolve_agent_types(topic, event_type)
    }

    /// Uniformly-random live worker offering `agent_type`.
    pub fn compatible_worker(&self, agent_type: &str) -> Option<WorkerId> {
        self.state.read().agent_types.compatible_worker(agent_type)
    }

    /// All workers offering `agent_type`; errors if no worker has
    /// registered the type.
    pub fn workers_for_type(&self, agent_type: &str) -> Result<Vec<WorkerId>> {
        let state = self.state.read();
        state
            .agent_types
            .workers_for(agent_type)
            .map(|workers| workers.iter().cloned().collect())
            .ok_or_else(|| AgentMeshError::TypeNotRegistered(agent_type.to_string()))
    }

    /// Resolves the worker hosting `agent_id`, placing the agent if it is
    /// unplaced or its worker is gone. Returns the binding and whether a
    /// new placement was made; `None` means no worker currently supports
    /// the agent's type.
    pub fn get_or_place(&self, agent_id: &AgentId) -> Option<(WorkerId, bool)> {
        let mut state = self.state.write();

        if let Some(bound) = state.placements.get(agent_id).cloned() {
            if state.workers.contains(&bound) {
                return Some((bound, false));
            }
            // Stale binding from a worker purged between accesses.
            state.placements.remove(agent_id);
        }

        match state.agent_types.compatible_worker(&agent_id.agent_type) {
            Some(worker) => {
                state.placements.place(agent_id.clone(), worker.clone());
                info!(agent = %agent_id, worker = %worker, "agent placed");
                Some((worker, true))
            }
            None => None,
        }
    }

    pub fn list_subscriptions(&self) -> Vec<SubscriptionEntry> {
        self.state.read().subscriptions.list()
    }

    /// Topic rules registered for `agent_type`, read from the forward
    /// index.
    pub fn subscriptions_for_agent_type(&self, agent_type: &str) -> Vec<Subscription> {
        self.state
            .read()
            .subscriptions
            .subscriptions_for_agent(agent_type)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn list_workers(&self) -> Vec<(WorkerId, BTreeSet<String>)> {
        let state = self.state.read();
        let mut workers: Vec<(WorkerId, BTreeSet<String>)> = state
            .workers
            .iter()
            .map(|(id, entry)| (id.clone(), entry.supported_types.clone()))
            .collect();
        workers.sort_by(|a, b| a.0.cmp(&b.0));
        workers
    }

    pub fn agent_types(&self) -> Vec<String> {
        let state = self.state.read();
        let mut types: Vec<String> = state.agent_types.agent_types().map(String::from).collect();
        types.sort();
        types
    }

    pub fn placement_count(&self) -> usize {
        self.state.read().placements.len()
    }

    pub fn worker_count(&self) -> usize {
        self.state.read().workers.len()
    }

    /// Exports the durable portion of the registry state. Workers and
    /// placements are ephemeral and excluded.
    pub fn export_snapshot(&self) -> crate::snapshot::RegistrySnapshot {
        crate::snapshot::RegistrySnapshot {
            subscriptions: self.list_subscriptions(),
        }
    }

    /// Replaces the subscription table with a previously exported
    /// snapshot. Worker and placement state is untouched.
    pub fn restore_snapshot(&self, snapshot: crate::snapshot::RegistrySnapshot) {
        let mut state = self.state.write();
        state.subscriptions.restore(snapshot.subscriptions);
        info!("registry snapshot restored");
    }

    /// Test/debug hook: forward and reverse subscription indices agree.
    pub fn subscription_indices_consistent(&self) -> bool {
        self.state.read().subscriptions.indices_consistent()
    }
}

fn remove_worker(state: &mut RegistryState, worker: &WorkerId) {
    let Some(entry) = state.workers.remove(worker) else {
        return;
    };
    for agent_type in &entry.supported_types {
        state.agent_types.unregister_type(agent_type, worker);
    }
    let evicted = state.placements.remove_worker(worker);
    info!(
        worker = %worker,
        types = entry.supported_types.len(),
        placements = evicted.len(),
        "worker unregistered"
    );
}

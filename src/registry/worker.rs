use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use super::types::WorkerId;

/// 存活 Worker 目录
///
/// Tracks every registered worker, the agent types it offers, and the
/// instant of its last heartbeat. Liveness decisions (the sweep) compare
/// `last_seen` against the configured timeout.
#[derive(Debug, Default)]
pub struct WorkerDirectory {
    workers: HashMap<WorkerId, WorkerEntry>,
}

#[derive(Debug)]
pub struct WorkerEntry {
    pub supported_types: BTreeSet<String>,
    pub last_seen: Instant,
}

impl WorkerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: re-registering merges the supported types and refreshes
    /// the liveness timestamp.
    pub fn register(&mut self, worker: WorkerId, supported_types: BTreeSet<String>) {
        let entry = self.workers.entry(worker).or_insert_with(|| WorkerEntry {
            supported_types: BTreeSet::new(),
            last_seen: Instant::now(),
        });
        entry.supported_types.extend(supported_types);
        entry.last_seen = Instant::now();
    }

    /// No-op for unknown workers; the caller is expected to re-register.
    pub fn heartbeat(&mut self, worker: &WorkerId) -> bool {
        match self.workers.get_mut(worker) {
            Some(entry) => {
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, worker: &WorkerId) -> Option<WorkerEntry> {
        self.workers.remove(worker)
    }

    pub fn contains(&self, worker: &WorkerId) -> bool {
        self.workers.contains_key(worker)
    }

    pub fn get(&self, worker: &WorkerId) -> Option<&WorkerEntry> {
        self.workers.get(worker)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WorkerId, &WorkerEntry)> {
        self.workers.iter()
    }

    /// Workers whose last heartbeat is older than `timeout`, as of `now`.
    pub fn expired(&self, now: Instant, timeout: Duration) -> Vec<WorkerId> {
        self.workers
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_seen) > timeout)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

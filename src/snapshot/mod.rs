use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{AgentMeshError, Result};
use crate::registry::SubscriptionEntry;

/// Durable image of the registry's explicit state. Workers and placements
/// are deliberately absent: workers re-register after a restart and
/// placements re-form lazily, so only subscriptions survive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub subscriptions: Vec<SubscriptionEntry>,
}

/// 快照存储 trait
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()>;
    async fn load(&self) -> Result<Option<RegistrySnapshot>>;
}

/// 内存存储实现
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: RwLock<Option<RegistrySnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        *self.inner.write() = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<RegistrySnapshot>> {
        Ok(self.inner.read().clone())
    }
}

/// JSON 文件存储实现
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| AgentMeshError::Snapshot(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| AgentMeshError::Snapshot(e.to_string()))?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<RegistrySnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| AgentMeshError::Snapshot(e.to_string()))?;
        let snapshot =
            serde_json::from_str(&json).map_err(|e| AgentMeshError::Snapshot(e.to_string()))?;
        Ok(Some(snapshot))
    }
}

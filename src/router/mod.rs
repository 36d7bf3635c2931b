use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AgentMeshError, Result};
use crate::registry::{AgentId, AgentRegistry, WorkerId};

/// An event published on a topic, before routing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEvent {
    pub topic: String,
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
}

impl TopicEvent {
    pub fn new(topic: impl Into<String>, event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            event_type: event_type.into(),
            payload,
        }
    }
}

/// One computed delivery: which agent instance, on which worker. The
/// transport call itself is the caller's side effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchEntry {
    pub agent_id: AgentId,
    pub worker: WorkerId,
}

/// 路由器：把事件和 RPC 解析成具体的投递目标
///
/// Stateless over the registry: every call consults the subscription
/// table and placement directory at that instant.
#[derive(Clone)]
pub struct Router {
    registry: Arc<AgentRegistry>,
}

impl Router {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Computes the dispatch list for an event: one agent instance per
    /// subscribed type per topic (the topic doubles as the instance key).
    /// Types with no compatible worker are skipped with a warning; they
    /// surface again on the next publish once a worker registers.
    pub fn route_event(&self, event: &TopicEvent) -> Vec<DispatchEntry> {
        let agent_types = self
            .registry
            .resolve_agent_types(&event.topic, &event.event_type);
        debug!(
            topic = %event.topic,
            event_type = %event.event_type,
            matches = agent_types.len(),
            "routing event"
        );

        let mut entries = Vec::with_capacity(agent_types.len());
        for agent_type in agent_types {
            let agent_id = AgentId::new(agent_type, event.topic.clone());
            match self.registry.get_or_place(&agent_id) {
                Some((worker, _)) => entries.push(DispatchEntry { agent_id, worker }),
                None => {
                    warn!(agent = %agent_id, "no worker available, skipping delivery");
                }
            }
        }
        entries
    }

    /// Resolves the worker hosting `agent_id` for a direct call, placing
    /// the agent if needed.
    pub fn route_rpc(&self, agent_id: &AgentId) -> Result<WorkerId> {
        match self.registry.get_or_place(agent_id) {
            Some((worker, _)) => Ok(worker),
            None => Err(AgentMeshError::Placement(agent_id.agent_type.clone())),
        }
    }
}

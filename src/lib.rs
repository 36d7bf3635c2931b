pub mod config;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod router;
pub mod runtime;
pub mod snapshot;
pub mod utils;

pub use config::RegistryConfig;
pub use error::{AgentMeshError, Result};
pub use gateway::{
    Ack, AddSubscriptionRequest, AddSubscriptionResponse, GatewayService, GetSubscriptionsRequest,
    GetSubscriptionsResponse, HeartbeatMessage, RegisterAgentTypeRequest, RemoveSubscriptionRequest,
};
pub use registry::{
    AgentId, AgentRegistry, AgentTypeRegistry, PlacementDirectory, Subscription, SubscriptionEntry,
    SubscriptionTable, WorkerDirectory, WorkerId,
};
pub use router::{DispatchEntry, Router, TopicEvent};
pub use runtime::{spawn_sweeper, SweeperHandle};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, RegistrySnapshot, SnapshotStore};
pub use utils::logging;

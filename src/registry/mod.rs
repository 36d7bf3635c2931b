// 注册表模块 - Worker 目录、类型注册、订阅与放置

pub mod agent_type;
pub mod placement;
pub mod registry;
pub mod subscription;
pub mod types;
pub mod worker;

pub use agent_type::AgentTypeRegistry;
pub use placement::PlacementDirectory;
pub use registry::AgentRegistry;
pub use subscription::SubscriptionTable;
pub use types::{AgentId, Subscription, SubscriptionEntry, WorkerId};
pub use worker::{WorkerDirectory, WorkerEntry};

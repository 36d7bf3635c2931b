use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentMeshError>;

#[derive(Debug, Error)]
pub enum AgentMeshError {
    #[error("subscription `{0}` not found")]
    SubscriptionNotFound(String),
    #[error("agent type `{0}` not registered")]
    TypeNotRegistered(String),
    #[error("no worker available for agent type `{0}`")]
    Placement(String),
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
    #[error("snapshot error: {0}")]
    Snapshot(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

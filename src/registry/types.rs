use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle identifying one live worker (gateway) connection.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// (type, key) 标识一个逻辑 Agent 实例
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentId {
    pub agent_type: String,
    pub key: String,
}

impl AgentId {
    pub fn new(agent_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.agent_type, self.key)
    }
}

/// A rule binding a topic to an agent type. Exact subscriptions match the
/// topic or event-type string itself; prefix subscriptions match any
/// event type that starts with the stored prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subscription {
    #[serde(rename = "typeSubscription", rename_all = "camelCase")]
    Exact {
        topic_type: String,
        agent_type: String,
    },
    #[serde(rename = "typePrefixSubscription", rename_all = "camelCase")]
    Prefix {
        topic_type_prefix: String,
        agent_type: String,
    },
}

impl Subscription {
    pub fn exact(topic_type: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self::Exact {
            topic_type: topic_type.into(),
            agent_type: agent_type.into(),
        }
    }

    pub fn prefix(topic_type_prefix: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self::Prefix {
            topic_type_prefix: topic_type_prefix.into(),
            agent_type: agent_type.into(),
        }
    }

    pub fn agent_type(&self) -> &str {
        match self {
            Self::Exact { agent_type, .. } | Self::Prefix { agent_type, .. } => agent_type,
        }
    }

    /// The topic string the subscription is indexed under.
    pub fn topic_key(&self) -> &str {
        match self {
            Self::Exact { topic_type, .. } => topic_type,
            Self::Prefix {
                topic_type_prefix, ..
            } => topic_type_prefix,
        }
    }

    pub fn matches(&self, topic: &str, event_type: &str) -> bool {
        match self {
            Self::Exact { topic_type, .. } => {
                topic_type == topic
                    || topic_type == event_type
                    || *topic_type == format!("{topic}.{event_type}")
            }
            Self::Prefix {
                topic_type_prefix, ..
            } => event_type.starts_with(topic_type_prefix.as_str()),
        }
    }
}

/// A stored subscription together with its removable id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEntry {
    pub id: String,
    pub subscription: Subscription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches_topic_event_and_concatenation() {
        let sub = Subscription::exact("greetings.hello", "greeter");
        assert!(sub.matches("greetings", "hello"));
        let sub = Subscription::exact("greetings", "greeter");
        assert!(sub.matches("greetings", "hello"));
        let sub = Subscription::exact("hello", "greeter");
        assert!(sub.matches("greetings", "hello"));
        let sub = Subscription::exact("farewells", "greeter");
        assert!(!sub.matches("greetings", "hello"));
    }

    #[test]
    fn prefix_matches_event_type_prefix() {
        let sub = Subscription::prefix("hel", "greeter");
        assert!(sub.matches("anything", "hello"));
        assert!(!sub.matches("anything", "goodbye"));
    }

    #[test]
    fn subscription_serializes_as_tagged_union() {
        let sub = Subscription::exact("greetings", "greeter");
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "typeSubscription": { "topicType": "greetings", "agentType": "greeter" }
            })
        );
    }
}

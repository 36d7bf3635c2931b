use std::collections::{BTreeSet, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AgentMeshError, Result};

use super::types::{Subscription, SubscriptionEntry};

/// 订阅表：topic 与 agent 类型之间的双向索引
///
/// Every subscription is stored three ways: under its agent type
/// (`agents_to_topics`), under its topic string (`topics_to_agents`), and
/// under its id (`by_id`) for removal. Both direction indices hold
/// subscription ids, so either side resolves without scanning the other.
/// Add and remove touch all three indices inside one `&mut self` call, so
/// readers never observe a half-updated pair.
///
/// The same (topic, agent type) pair may be subscribed more than once;
/// each call yields an independent id and an independent stored entry.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    seq: u64,
    by_id: HashMap<String, Subscription>,
    agents_to_topics: HashMap<String, Vec<String>>,
    topics_to_agents: HashMap<String, Vec<String>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints an id not already present in the table. The sequence counter
    /// alone is not enough: a restored snapshot carries ids minted by an
    /// earlier process, so each candidate is checked against the id index.
    fn next_subscription_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards");
        loop {
            let id = format!("sub-{}-{}", self.seq, now.as_secs());
            self.seq += 1;
            if !self.by_id.contains_key(&id) {
                return id;
            }
        }
    }

    /// Stores the subscription under all three indices and returns the
    /// generated id.
    pub fn subscribe(&mut self, subscription: Subscription) -> String {
        let id = self.next_subscription_id();
        let agent_type = subscription.agent_type().to_string();
        let topic = subscription.topic_key().to_string();

        self.agents_to_topics
            .entry(agent_type)
            .or_default()
            .push(id.clone());
        self.topics_to_agents
            .entry(topic)
            .or_default()
            .push(id.clone());
        self.by_id.insert(id.clone(), subscription);
        id
    }

    /// Removes the subscription from all three indices. Unknown or
    /// malformed ids fail with `SubscriptionNotFound`.
    pub fn unsubscribe(&mut self, id: &str) -> Result<Subscription> {
        let subscription = self
            .by_id
            .remove(id)
            .ok_or_else(|| AgentMeshError::SubscriptionNotFound(id.to_string()))?;

        remove_id(&mut self.agents_to_topics, subscription.agent_type(), id);
        remove_id(&mut self.topics_to_agents, subscription.topic_key(), id);
        Ok(subscription)
    }

    /// Agent types that should receive an event published as
    /// (`topic`, `event_type`): the union of exact matches on the topic,
    /// the event type, and `topic.event_type`, plus prefix subscriptions
    /// whose prefix starts `event_type`. Output is a set even though the
    /// table may hold duplicate entries.
    pub fn resolve_agent_types(&self, topic: &str, event_type: &str) -> BTreeSet<String> {
        let mut resolved = BTreeSet::new();

        // The reverse index only pre-filters candidates; the matching
        // rules themselves live in `Subscription::matches`.
        let concat = format!("{topic}.{event_type}");
        for key in [topic, event_type, concat.as_str()] {
            for sub in self.subscriptions_for_topic(key) {
                if matches!(sub, Subscription::Exact { .. }) && sub.matches(topic, event_type) {
                    resolved.insert(sub.agent_type().to_string());
                }
            }
        }

        // Prefix subscriptions cannot be answered from the exact index.
        for sub in self.by_id.values() {
            if matches!(sub, Subscription::Prefix { .. }) && sub.matches(topic, event_type) {
                resolved.insert(sub.agent_type().to_string());
            }
        }

        resolved
    }

    pub fn subscriptions_for_topic(&self, topic: &str) -> Vec<&Subscription> {
        self.ids_to_subscriptions(self.topics_to_agents.get(topic))
    }

    pub fn subscriptions_for_agent(&self, agent_type: &str) -> Vec<&Subscription> {
        self.ids_to_subscriptions(self.agents_to_topics.get(agent_type))
    }

    fn ids_to_subscriptions(&self, ids: Option<&Vec<String>>) -> Vec<&Subscription> {
        ids.map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Replaces the table contents with previously exported entries,
    /// keeping their original ids so later unsubscribes still resolve.
    pub fn restore(&mut self, entries: Vec<SubscriptionEntry>) {
        self.by_id.clear();
        self.agents_to_topics.clear();
        self.topics_to_agents.clear();
        for entry in entries {
            // Advance past the restored counter so fresh ids from this
            // process cannot re-mint a restored one.
            if let Some(n) = entry
                .id
                .strip_prefix("sub-")
                .and_then(|rest| rest.split('-').next())
                .and_then(|n| n.parse::<u64>().ok())
            {
                self.seq = self.seq.max(n + 1);
            }
            self.agents_to_topics
                .entry(entry.subscription.agent_type().to_string())
                .or_default()
                .push(entry.id.clone());
            self.topics_to_agents
                .entry(entry.subscription.topic_key().to_string())
                .or_default()
                .push(entry.id.clone());
            self.by_id.insert(entry.id, entry.subscription);
        }
    }

    /// Every stored subscription, flattened across the id index.
    pub fn list(&self) -> Vec<SubscriptionEntry> {
        let mut entries: Vec<SubscriptionEntry> = self
            .by_id
            .iter()
            .map(|(id, subscription)| SubscriptionEntry {
                id: id.clone(),
                subscription: subscription.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Index-symmetry check used by tests: each stored subscription id is
    /// present in the forward index iff it is present in the reverse one.
    pub fn indices_consistent(&self) -> bool {
        let in_index = |index: &HashMap<String, Vec<String>>, key: &str, id: &str| {
            index
                .get(key)
                .map(|ids| ids.iter().filter(|i| *i == id).count())
                .unwrap_or(0)
        };
        self.by_id.iter().all(|(id, sub)| {
            in_index(&self.agents_to_topics, sub.agent_type(), id) == 1
                && in_index(&self.topics_to_agents, sub.topic_key(), id) == 1
        }) && self.agents_to_topics.values().flatten().count() == self.by_id.len()
            && self.topics_to_agents.values().flatten().count() == self.by_id.len()
    }
}

fn remove_id(index: &mut HashMap<String, Vec<String>>, key: &str, id: &str) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|i| i != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

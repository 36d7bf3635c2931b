use std::sync::Arc;

use agentmesh::{
    AddSubscriptionRequest, AgentRegistry, GatewayService, GetSubscriptionsRequest,
    HeartbeatMessage, RegisterAgentTypeRequest, RegistryConfig, RemoveSubscriptionRequest,
    Subscription,
};
use serde_json::json;

fn service() -> GatewayService {
    GatewayService::new(Arc::new(AgentRegistry::new(RegistryConfig::default())))
}

#[test]
fn register_agent_type_acks_with_request_id() {
    let service = service();
    let ack = service.register_agent_type(RegisterAgentTypeRequest {
        request_id: "req-1".into(),
        agent_type: "greeter".into(),
        worker: "w1".into(),
    });
    assert_eq!(ack.request_id, "req-1");
    assert!(ack.success);
    assert!(ack.error.is_none());
}

#[test]
fn add_subscription_accepts_both_wire_variants() {
    let service = service();

    let response = service.add_subscription(AddSubscriptionRequest {
        request_id: "req-1".into(),
        subscription: json!({
            "typeSubscription": { "topicType": "greetings", "agentType": "greeter" }
        }),
    });
    assert!(response.success);
    assert!(response.subscription_id.is_some());

    let response = service.add_subscription(AddSubscriptionRequest {
        request_id: "req-2".into(),
        subscription: json!({
            "typePrefixSubscription": { "topicTypePrefix": "audit.", "agentType": "auditor" }
        }),
    });
    assert!(response.success);

    let listed = service.get_subscriptions(GetSubscriptionsRequest {
        request_id: "req-3".into(),
    });
    assert!(listed.success);
    assert_eq!(listed.subscriptions.len(), 2);
}

#[test]
fn unknown_subscription_variant_is_rejected() {
    let service = service();
    let response = service.add_subscription(AddSubscriptionRequest {
        request_id: "req-1".into(),
        subscription: json!({
            "mysterySubscription": { "topicType": "greetings" }
        }),
    });
    assert_eq!(response.request_id, "req-1");
    assert!(!response.success);
    assert!(response.error.unwrap().contains("invalid subscription"));
    assert!(response.subscription_id.is_none());
}

#[test]
fn unset_subscription_variant_is_rejected() {
    let service = service();
    let response = service.add_subscription(AddSubscriptionRequest {
        request_id: "req-1".into(),
        subscription: json!(null),
    });
    assert!(!response.success);
}

#[test]
fn remove_subscription_round_trip() {
    let service = service();
    let added = service.add_subscription(AddSubscriptionRequest {
        request_id: "req-1".into(),
        subscription: json!({
            "typeSubscription": { "topicType": "greetings", "agentType": "greeter" }
        }),
    });
    let id = added.subscription_id.unwrap();

    let ack = service.remove_subscription(RemoveSubscriptionRequest {
        request_id: "req-2".into(),
        subscription_id: id,
    });
    assert!(ack.success);

    let listed = service.get_subscriptions(GetSubscriptionsRequest {
        request_id: "req-3".into(),
    });
    assert!(listed.subscriptions.is_empty());
}

#[test]
fn remove_unknown_subscription_reports_error() {
    let service = service();
    let ack = service.remove_subscription(RemoveSubscriptionRequest {
        request_id: "req-1".into(),
        subscription_id: "not-a-real-id".into(),
    });
    assert_eq!(ack.request_id, "req-1");
    assert!(!ack.success);
    assert!(ack.error.unwrap().contains("not-a-real-id"));
}

#[test]
fn heartbeat_is_fire_and_forget() {
    let registry = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    let service = GatewayService::new(registry.clone());

    // Unknown worker: silently ignored.
    service.heartbeat(HeartbeatMessage { worker: "ghost".into() });
    assert_eq!(registry.worker_count(), 0);

    service.register_agent_type(RegisterAgentTypeRequest {
        request_id: "req-1".into(),
        agent_type: "greeter".into(),
        worker: "w1".into(),
    });
    service.heartbeat(HeartbeatMessage { worker: "w1".into() });
    assert_eq!(registry.worker_count(), 1);
}

#[test]
fn wire_subscription_shape_matches_core_type() {
    let sub = Subscription::prefix("audit.", "auditor");
    let value = serde_json::to_value(&sub).unwrap();
    assert_eq!(
        value,
        json!({
            "typePrefixSubscription": { "topicTypePrefix": "audit.", "agentType": "auditor" }
        })
    );
    let back: Subscription = serde_json::from_value(value).unwrap();
    assert_eq!(back, sub);
}

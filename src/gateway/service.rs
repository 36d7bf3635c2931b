use std::sync::Arc;

use tracing::debug;

use crate::error::AgentMeshError;
use crate::registry::{AgentRegistry, Subscription, WorkerId};

use super::messages::{
    Ack, AddSubscriptionRequest, AddSubscriptionResponse, GetSubscriptionsRequest,
    GetSubscriptionsResponse, HeartbeatMessage, RegisterAgentTypeRequest,
    RemoveSubscriptionRequest,
};

/// 网关服务：把 wire 形状的请求映射到注册表调用
///
/// Errors never escape as `Err`; they are folded into the response
/// envelope the way an RPC front door would report them.
#[derive(Clone)]
pub struct GatewayService {
    registry: Arc<AgentRegistry>,
}

impl GatewayService {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    pub fn register_agent_type(&self, request: RegisterAgentTypeRequest) -> Ack {
        let worker = WorkerId::new(request.worker);
        self.registry.register_worker(worker, [request.agent_type]);
        Ack::ok(request.request_id)
    }

    pub fn add_subscription(&self, request: AddSubscriptionRequest) -> AddSubscriptionResponse {
        let subscription: Subscription = match serde_json::from_value(request.subscription) {
            Ok(subscription) => subscription,
            Err(err) => {
                let err = AgentMeshError::InvalidSubscription(err.to_string());
                return AddSubscriptionResponse {
                    request_id: request.request_id,
                    success: false,
                    error: Some(err.to_string()),
                    subscription_id: None,
                };
            }
        };
        let id = self.registry.subscribe(subscription);
        AddSubscriptionResponse {
            request_id: request.request_id,
            success: true,
            error: None,
            subscription_id: Some(id),
        }
    }

    pub fn remove_subscription(&self, request: RemoveSubscriptionRequest) -> Ack {
        match self.registry.unsubscribe(&request.subscription_id) {
            Ok(()) => Ack::ok(request.request_id),
            Err(err) => Ack::err(request.request_id, err),
        }
    }

    pub fn get_subscriptions(&self, request: GetSubscriptionsRequest) -> GetSubscriptionsResponse {
        GetSubscriptionsResponse {
            request_id: request.request_id,
            success: true,
            error: None,
            subscriptions: self.registry.list_subscriptions(),
        }
    }

    /// Fire-and-forget: no response, unknown workers are ignored.
    pub fn heartbeat(&self, message: HeartbeatMessage) {
        let worker = WorkerId::new(message.worker);
        debug!(worker = %worker, "heartbeat received");
        self.registry.heartbeat(&worker);
    }
}

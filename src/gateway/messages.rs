use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::SubscriptionEntry;

/// Request/response envelopes mirroring what an RPC front door would
/// carry. Every response echoes the caller's `requestId` and reports
/// failure as `success=false` plus an error string instead of a
/// transport-level fault.

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAgentTypeRequest {
    pub request_id: String,
    pub agent_type: String,
    pub worker: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubscriptionRequest {
    pub request_id: String,
    /// Tagged union: `{"typeSubscription": {...}}` or
    /// `{"typePrefixSubscription": {...}}`. Kept raw so an unknown or
    /// unset variant can be rejected as an invalid subscription rather
    /// than a deserialization fault on the whole request.
    pub subscription: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSubscriptionRequest {
    pub request_id: String,
    pub subscription_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSubscriptionsRequest {
    pub request_id: String,
}

/// Fire-and-forget; no response payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatMessage {
    pub worker: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            error: None,
        }
    }

    pub fn err(request_id: impl Into<String>, error: impl ToString) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubscriptionResponse {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSubscriptionsResponse {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub subscriptions: Vec<SubscriptionEntry>,
}

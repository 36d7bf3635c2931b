// 网关模块 - 进程内的 RPC 门面

pub mod messages;
pub mod service;

pub use messages::{
    Ack, AddSubscriptionRequest, AddSubscriptionResponse, GetSubscriptionsRequest,
    GetSubscriptionsResponse, HeartbeatMessage, RegisterAgentTypeRequest,
    RemoveSubscriptionRequest,
};
pub use service::GatewayService;

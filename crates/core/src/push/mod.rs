//! Push module - VAPID signing, push message models, the transport capability
//! and the fan-out dispatcher.

mod dispatcher;
mod push_model;
mod push_traits;
mod vapid;

pub use dispatcher::{DispatchConfig, NotificationDispatcher};
pub use push_model::{
    DeliveryError, DeliveryFailure, DeliveryReport, DeliveryResult, NotificationPayload,
    PushMessage, PushResponse,
};
pub use push_traits::PushTransport;
pub use vapid::{
    audience_for_endpoint, create_vapid_headers, PushHeaders, VapidClaims, VapidError,
    VapidKeys, VapidSigner,
};

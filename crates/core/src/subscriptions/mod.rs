//! Subscriptions module - push subscription models, the store access layer
//! and the registration service behind the control API.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_store;
mod subscriptions_traits;

pub use subscriptions_model::{PushSubscription, SubscriptionKeys};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_store::SubscriptionStore;
pub use subscriptions_traits::{SubscriptionServiceTrait, SubscriptionStoreTrait};

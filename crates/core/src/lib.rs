//! YSWS Notifier Core - Domain entities, services, and traits.
//!
//! This crate contains the notification logic for the YSWS program tracker:
//! catalog change detection, the subscription store, VAPID signing and the
//! Web Push dispatcher. It is transport- and storage-agnostic and defines the
//! capability traits (`CatalogSource`, `PushTransport`, `KeyValueStore`) that
//! runtime adapters implement.

pub mod constants;
pub mod detection;
pub mod errors;
pub mod kv;
pub mod programs;
pub mod push;
pub mod subscriptions;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

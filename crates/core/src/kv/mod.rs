//! Key-value persistence capability.
//!
//! The notifier keeps all cycle-to-cycle state behind this trait so the
//! detection cycle and the control API can run against any durable store.

mod kv_traits;
mod memory_store;

pub use kv_traits::KeyValueStore;
pub use memory_store::InMemoryKeyValueStore;

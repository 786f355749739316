//! File-backed storage for the YSWS notifier.
//!
//! Implements the `KeyValueStore` capability from `ysws-notifier-core` on top
//! of a single JSON document on disk. The subscription list and the catalog
//! snapshot are the only keys the notifier writes, so the whole document is
//! rewritten on every `put`.
//!
//! ```text
//! core (SubscriptionStore)
//!          │
//!          ▼
//!  storage-file (this crate)
//!          │
//!          ▼
//!     store.json
//! ```

pub mod errors;
pub mod file_store;

pub use errors::StorageError;
pub use file_store::FileKeyValueStore;

// Re-export from ysws-notifier-core for convenience
pub use ysws_notifier_core::errors::{Error, Result};

//! Backing stores for graphbind records.
//!
//! Every record owns exactly one store. The store holds declared and undeclared properties side
//! by side and tracks which keys changed since initialization completed, so callers can emit
//! PATCH-style payloads containing only modified properties.
//!
//! # Design constraints
//! - A store is never shared between records; factories hand out a fresh store per call.
//! - Keys are stored exactly as given, including empty and whitespace-padded ones.
//! - Removing a key after initialization completed counts as changing it to null.
//! - Setting a value equal to the current one is a no-op.

mod error;
mod memory;
mod ports;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryBackingStore, InMemoryBackingStoreFactory};
pub use ports::{BackingStore, BackingStoreFactory, StoreValue, Subscriber};

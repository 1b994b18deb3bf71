use std::fmt;

use crate::error::StoreResult;

/// Values a backing store can hold.
///
/// The store needs equality to suppress no-op writes and a notion of null to report keys that
/// were explicitly cleared.
pub trait StoreValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn is_null(&self) -> bool;
}

impl<T> StoreValue for Option<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

/// Change callback: `(key, old, new)`. `new` is `None` when the key was removed.
pub type Subscriber<V> = Box<dyn Fn(&str, Option<&V>, Option<&V>) + Send + Sync>;

/// Key/value storage backing a single record.
///
/// While initialization is in progress (for example during decoding) writes are recorded as
/// unchanged. Completing initialization clears every changed flag, so only writes made
/// afterwards count as changes.
pub trait BackingStore<V: StoreValue>: fmt::Debug + Send + Sync {
    /// Value stored under `key`. Hidden when only changed values are returned and the key is
    /// unchanged.
    fn get(&self, key: &str) -> Option<&V>;

    /// Value stored under `key`, ignoring the changed-values filter.
    fn peek(&self, key: &str) -> Option<&V>;

    /// Mutable access that marks the key as changed once initialization has completed.
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Mutable access without touching change tracking.
    fn peek_mut(&mut self, key: &str) -> Option<&mut V>;

    fn set(&mut self, key: &str, value: V) -> StoreResult<()>;

    /// Remove `key`. Once initialization has completed the removal is tracked like a change
    /// to null until the key is set again.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Keys removed since initialization completed, in removal order.
    fn removed_keys(&self) -> Vec<&str>;

    /// Presence check that ignores the changed-values filter.
    fn contains_key(&self, key: &str) -> bool;

    /// Entries in insertion order, honouring the changed-values filter.
    fn entries(&self) -> Vec<(&str, &V)>;

    /// Every entry in insertion order regardless of change tracking.
    fn raw_entries(&self) -> Vec<(&str, &V)>;

    fn is_changed(&self, key: &str) -> bool;

    /// Keys whose value was changed to null after initialization, followed by removed keys.
    fn keys_changed_to_null(&self) -> Vec<&str>;

    /// Flag every stored key as changed, as if each had been written after initialization.
    fn mark_all_changed(&mut self);

    fn clear(&mut self);

    fn initialization_completed(&self) -> bool;

    fn set_initialization_completed(&mut self, completed: bool);

    fn return_only_changed_values(&self) -> bool;

    fn set_return_only_changed_values(&mut self, only_changed: bool);

    /// Register a callback under a generated id.
    fn subscribe(&mut self, callback: Subscriber<V>) -> String;

    fn subscribe_with_id(&mut self, id: &str, callback: Subscriber<V>) -> StoreResult<()>;

    fn unsubscribe(&mut self, id: &str) -> StoreResult<()>;

    /// Copy of the stored entries and flags. Subscriptions are not carried over.
    fn clone_box(&self) -> Box<dyn BackingStore<V>>;
}

/// Source of fresh stores, one per record.
pub trait BackingStoreFactory<V: StoreValue>: Send + Sync {
    fn create(&self) -> Box<dyn BackingStore<V>>;
}

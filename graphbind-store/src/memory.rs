use std::collections::BTreeMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ports::{BackingStore, BackingStoreFactory, StoreValue, Subscriber};

#[derive(Debug, Clone, PartialEq)]
struct Slot<V> {
    value: V,
    changed: bool,
}

/// Insertion-ordered in-memory store.
pub struct InMemoryBackingStore<V: StoreValue> {
    slots: IndexMap<String, Slot<V>>,
    removed: IndexSet<String>,
    subscribers: BTreeMap<String, Subscriber<V>>,
    initialization_completed: bool,
    return_only_changed_values: bool,
}

impl<V: StoreValue> InMemoryBackingStore<V> {
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
            removed: IndexSet::new(),
            subscribers: BTreeMap::new(),
            initialization_completed: true,
            return_only_changed_values: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn visible(&self, slot: &Slot<V>) -> bool {
        !self.return_only_changed_values || slot.changed
    }

    fn notify(&self, key: &str, old: Option<&V>, new: Option<&V>) {
        for callback in self.subscribers.values() {
            callback(key, old, new);
        }
    }
}

impl<V: StoreValue> Default for InMemoryBackingStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: StoreValue> Clone for InMemoryBackingStore<V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            removed: self.removed.clone(),
            subscribers: BTreeMap::new(),
            initialization_completed: self.initialization_completed,
            return_only_changed_values: self.return_only_changed_values,
        }
    }
}

impl<V: StoreValue> fmt::Debug for InMemoryBackingStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryBackingStore")
            .field("slots", &self.slots)
            .field("removed", &self.removed)
            .field("subscribers", &self.subscribers.keys().collect::<Vec<_>>())
            .field("initialization_completed", &self.initialization_completed)
            .field("return_only_changed_values", &self.return_only_changed_values)
            .finish()
    }
}

impl<V: StoreValue> BackingStore<V> for InMemoryBackingStore<V> {
    fn get(&self, key: &str) -> Option<&V> {
        let slot = self.slots.get(key)?;
        self.visible(slot).then_some(&slot.value)
    }

    fn peek(&self, key: &str) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let completed = self.initialization_completed;
        let only_changed = self.return_only_changed_values;
        let slot = self.slots.get_mut(key)?;
        if only_changed && !slot.changed {
            return None;
        }
        if completed {
            slot.changed = true;
        }
        Some(&mut slot.value)
    }

    fn peek_mut(&mut self, key: &str) -> Option<&mut V> {
        self.slots.get_mut(key).map(|slot| &mut slot.value)
    }

    fn set(&mut self, key: &str, value: V) -> StoreResult<()> {
        self.removed.shift_remove(key);
        let changed = self.initialization_completed;
        let old = match self.slots.get_mut(key) {
            Some(slot) if slot.value == value => return Ok(()),
            Some(slot) => {
                let old = std::mem::replace(&mut slot.value, value);
                slot.changed = changed;
                Some(old)
            }
            None => {
                self.slots.insert(key.to_string(), Slot { value, changed });
                None
            }
        };

        if !self.subscribers.is_empty() {
            let new = self.slots.get(key).map(|slot| &slot.value);
            self.notify(key, old.as_ref(), new);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.slots.shift_remove(key)?.value;
        if self.initialization_completed {
            self.removed.insert(key.to_string());
        }
        self.notify(key, Some(&removed), None);
        Some(removed)
    }

    fn removed_keys(&self) -> Vec<&str> {
        self.removed.iter().map(String::as_str).collect()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn entries(&self) -> Vec<(&str, &V)> {
        self.slots
            .iter()
            .filter(|(_, slot)| self.visible(slot))
            .map(|(key, slot)| (key.as_str(), &slot.value))
            .collect()
    }

    fn raw_entries(&self) -> Vec<(&str, &V)> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.as_str(), &slot.value))
            .collect()
    }

    fn is_changed(&self, key: &str) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.changed)
    }

    fn keys_changed_to_null(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.changed && slot.value.is_null())
            .map(|(key, _)| key.as_str())
            .chain(self.removed.iter().map(String::as_str))
            .collect()
    }

    fn mark_all_changed(&mut self) {
        for slot in self.slots.values_mut() {
            slot.changed = true;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.removed.clear();
    }

    fn initialization_completed(&self) -> bool {
        self.initialization_completed
    }

    fn set_initialization_completed(&mut self, completed: bool) {
        self.initialization_completed = completed;
        self.removed.clear();
        for slot in self.slots.values_mut() {
            slot.changed = !completed;
        }
    }

    fn return_only_changed_values(&self) -> bool {
        self.return_only_changed_values
    }

    fn set_return_only_changed_values(&mut self, only_changed: bool) {
        self.return_only_changed_values = only_changed;
    }

    fn subscribe(&mut self, callback: Subscriber<V>) -> String {
        let id = Uuid::new_v4().to_string();
        self.subscribers.insert(id.clone(), callback);
        id
    }

    fn subscribe_with_id(&mut self, id: &str, callback: Subscriber<V>) -> StoreResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::EmptySubscriberId);
        }
        if self.subscribers.contains_key(id) {
            return Err(StoreError::DuplicateSubscriber { id: id.to_string() });
        }
        self.subscribers.insert(id.to_string(), callback);
        Ok(())
    }

    fn unsubscribe(&mut self, id: &str) -> StoreResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::EmptySubscriberId);
        }
        self.subscribers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::UnknownSubscriber { id: id.to_string() })
    }

    fn clone_box(&self) -> Box<dyn BackingStore<V>> {
        Box::new(self.clone())
    }
}

/// Hands out empty [`InMemoryBackingStore`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryBackingStoreFactory;

impl<V: StoreValue> BackingStoreFactory<V> for InMemoryBackingStoreFactory {
    fn create(&self) -> Box<dyn BackingStore<V>> {
        Box::new(InMemoryBackingStore::<V>::new())
    }
}

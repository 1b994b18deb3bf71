//! Discriminator-driven construction of polymorphic records.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::DecodeResult;
use crate::ports::ParseNode;
use crate::record::Record;

/// Property that names the concrete type of a polymorphic payload.
pub const DISCRIMINATOR_PROPERTY: &str = "@odata.type";

/// Maps discriminator strings to factories for the concrete variants of one base type.
///
/// Unregistered, absent and null discriminators all fall back to the base factory, so payloads
/// naming types this build does not know about still decode.
pub struct DiscriminatorRegistry<T = Record> {
    property: &'static str,
    fallback: fn() -> T,
    entries: BTreeMap<String, fn() -> T>,
}

impl<T> DiscriminatorRegistry<T> {
    pub fn new(fallback: fn() -> T) -> Self {
        Self {
            property: DISCRIMINATOR_PROPERTY,
            fallback,
            entries: BTreeMap::new(),
        }
    }

    /// Read the discriminator from another property.
    pub fn with_property(mut self, property: &'static str) -> Self {
        self.property = property;
        self
    }

    /// Register a factory, returning the one it replaces.
    pub fn register(&mut self, key: impl Into<String>, factory: fn() -> T) -> Option<fn() -> T> {
        self.entries.insert(key.into(), factory)
    }

    pub fn with(mut self, key: impl Into<String>, factory: fn() -> T) -> Self {
        self.register(key, factory);
        self
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered discriminators in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instance for `discriminator`, or the base instance when it is absent or unregistered.
    pub fn resolve(&self, discriminator: Option<&str>) -> T {
        match discriminator {
            Some(key) => match self.entries.get(key) {
                Some(factory) => factory(),
                None => {
                    debug!(
                        property = self.property,
                        discriminator = key,
                        "unregistered discriminator, using base type"
                    );
                    (self.fallback)()
                }
            },
            None => (self.fallback)(),
        }
    }

    /// Peek the discriminator child of `node` and build the matching instance.
    ///
    /// A discriminator that is present but not a string is a decode error.
    pub fn create(&self, node: &dyn ParseNode) -> DecodeResult<T> {
        let discriminator = match node.child_node(self.property) {
            Some(child) => child
                .string_value()
                .map_err(|e| e.in_field(self.property))?,
            None => None,
        };
        Ok(self.resolve(discriminator.as_deref()))
    }
}

impl<T> fmt::Debug for DiscriminatorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscriminatorRegistry")
            .field("property", &self.property)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

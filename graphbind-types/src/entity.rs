//! The root of the entity hierarchy.

use std::sync::LazyLock;

use graphbind_core::{
    DISCRIMINATOR_PROPERTY, DecodeResult, DiscriminatorRegistry, FieldDef, Model, ParseNode,
    Record, Schema,
};

use crate::odata_type;
use crate::{callrecords, security};

pub static ENTITY: Schema = Schema {
    name: "microsoft.graph.entity",
    discriminator: None,
    base: None,
    fields: &[FieldDef::string("id"), FieldDef::string(DISCRIMINATOR_PROPERTY)],
};

/// Every entity type in this crate, keyed by discriminator.
pub static ENTITY_REGISTRY: LazyLock<DiscriminatorRegistry> = LazyLock::new(|| {
    DiscriminatorRegistry::new(new_entity as fn() -> Record)
        .with(odata_type::ARTIFACT, security::new_artifact)
        .with(odata_type::HOST, security::new_host)
        .with(odata_type::HOSTNAME, security::new_hostname)
        .with(odata_type::IP_ADDRESS, security::new_ip_address)
        .with(odata_type::HOST_PAIR, security::new_host_pair)
        .with(odata_type::HOST_REPUTATION, security::new_host_reputation)
        .with(odata_type::CALL_RECORD, callrecords::new_call_record)
});

pub fn new_entity() -> Record {
    Record::new(&ENTITY)
}

pub fn create_entity(node: &dyn ParseNode) -> DecodeResult<Record> {
    ENTITY_REGISTRY.create(node)
}

record_model! {
    /// Any entity, viewed only through the properties every entity shares.
    Entity => ENTITY, registry = ENTITY_REGISTRY
}

/// Accessors shared by every entity type.
pub trait EntityLike: Model {
    fn id(&self) -> Option<&str> {
        self.as_record().string("id")
    }

    fn set_id(&mut self, id: &str) {
        self.as_record_mut().put("id", id);
    }
}

impl EntityLike for Entity {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_registered_entity_derives_from_entity() {
        for key in ENTITY_REGISTRY.keys() {
            let record = ENTITY_REGISTRY.resolve(Some(key));
            assert!(record.schema().is_a(&ENTITY), "{key} is not an entity");
            assert_eq!(record.odata_type(), Some(key));
        }
    }

    #[test]
    fn plain_entity_has_no_discriminator() {
        let entity = Entity::default();
        assert_eq!(entity.odata_type(), None);
        assert_eq!(entity.id(), None);
    }

    #[test]
    fn unknown_discriminator_resolves_to_entity() {
        let record = ENTITY_REGISTRY.resolve(Some("#microsoft.graph.brandNewThing"));
        assert_eq!(record.schema().name, ENTITY.name);
    }
}

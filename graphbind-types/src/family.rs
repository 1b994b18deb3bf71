//! Named entry points for decoding payloads whose root type is only known at runtime.

use std::sync::LazyLock;

use graphbind_core::{DiscriminatorRegistry, EnumCodec, RecordFactory, Schema};

use crate::callrecords::{
    AUDIO_CODEC, CALL_RECORD, CALL_TYPE, MEDIA, MEDIA_STREAM, MEDIA_STREAM_DIRECTION, MODALITY,
    create_call_record, create_media, create_media_stream,
};
use crate::entity::{ENTITY, ENTITY_REGISTRY, create_entity};
use crate::security::{
    ARTIFACT, ARTIFACT_REGISTRY, HOST, HOST_REGISTRY, HOST_REPUTATION_CLASSIFICATION,
    create_artifact, create_host,
};

/// A root type plus the factory that builds it (or one of its variants) from a payload.
#[derive(Debug)]
pub struct Family {
    pub name: &'static str,
    pub schema: &'static Schema,
    pub factory: RecordFactory,
    registry: Option<&'static LazyLock<DiscriminatorRegistry>>,
}

impl Family {
    pub fn registry(&self) -> Option<&'static DiscriminatorRegistry> {
        self.registry.map(LazyLock::force)
    }

    /// Discriminators this family can decode into, sorted.
    pub fn discriminators(&self) -> Vec<&'static str> {
        match self.registry() {
            Some(registry) => registry.keys().collect(),
            None => self.schema.discriminator.into_iter().collect(),
        }
    }
}

static FAMILIES: &[Family] = &[
    Family {
        name: "entity",
        schema: &ENTITY,
        factory: create_entity,
        registry: Some(&ENTITY_REGISTRY),
    },
    Family {
        name: "artifact",
        schema: &ARTIFACT,
        factory: create_artifact,
        registry: Some(&ARTIFACT_REGISTRY),
    },
    Family {
        name: "host",
        schema: &HOST,
        factory: create_host,
        registry: Some(&HOST_REGISTRY),
    },
    Family {
        name: "callRecord",
        schema: &CALL_RECORD,
        factory: create_call_record,
        registry: None,
    },
    Family {
        name: "media",
        schema: &MEDIA,
        factory: create_media,
        registry: None,
    },
    Family {
        name: "mediaStream",
        schema: &MEDIA_STREAM,
        factory: create_media_stream,
        registry: None,
    },
];

static ENUM_CODECS: &[&EnumCodec] = &[
    &AUDIO_CODEC,
    &CALL_TYPE,
    &HOST_REPUTATION_CLASSIFICATION,
    &MEDIA_STREAM_DIRECTION,
    &MODALITY,
];

pub fn families() -> &'static [Family] {
    FAMILIES
}

pub fn family(name: &str) -> Option<&'static Family> {
    FAMILIES.iter().find(|family| family.name == name)
}

pub fn enum_codecs() -> &'static [&'static EnumCodec] {
    ENUM_CODECS
}

pub fn enum_codec(name: &str) -> Option<&'static EnumCodec> {
    ENUM_CODECS.iter().copied().find(|codec| codec.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn family_lookup_by_name() {
        assert_eq!(family("host").map(|f| f.schema.name), Some(HOST.name));
        assert!(family("nope").is_none());
    }

    #[test]
    fn host_family_lists_its_variants() {
        assert_eq!(
            family("host").unwrap().discriminators(),
            vec![
                "#microsoft.graph.security.hostname",
                "#microsoft.graph.security.ipAddress",
            ]
        );
    }

    #[test]
    fn single_type_family_lists_its_own_discriminator() {
        assert_eq!(
            family("mediaStream").unwrap().discriminators(),
            vec!["#microsoft.graph.callRecords.mediaStream"]
        );
    }

    #[test]
    fn codec_names_are_unique_and_sorted() {
        let names: Vec<_> = enum_codecs().iter().map(|codec| codec.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn codec_lookup_by_wire_name() {
        let codec = enum_codec("hostReputationClassification").unwrap();
        assert_eq!(codec.sentinel(), Some("unknownFutureValue"));
    }
}

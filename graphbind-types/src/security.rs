//! Threat-intelligence artifacts: hosts and what is known about them.
//!
//! [`HOST`] declares a subset of the service's host properties. `childHostPairs`,
//! `parentHostPairs`, `components`, `cookies`, `passiveDns`, `sslCertificates`, `trackers` and
//! `whois` are not declared and round-trip as additional data.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use graphbind_core::{
    DecodeResult, DiscriminatorRegistry, FieldDef, Model, ParseNode, Record, ScalarKind, Schema,
    WireEnum,
};

use crate::entity::{ENTITY, EntityLike};
use crate::odata_type;

graphbind_core::wire_enum! {
    pub enum HostReputationClassification: HOST_REPUTATION_CLASSIFICATION =
        single("hostReputationClassification")
    {
        Unknown => "unknown",
        Neutral => "neutral",
        Suspicious => "suspicious",
        Malicious => "malicious",
        UnknownFutureValue => "unknownFutureValue",
    }
    sentinel = "unknownFutureValue";
}

pub static ARTIFACT: Schema = Schema {
    name: "microsoft.graph.security.artifact",
    discriminator: Some(odata_type::ARTIFACT),
    base: Some(&ENTITY),
    fields: &[],
};

pub static HOST: Schema = Schema {
    name: "microsoft.graph.security.host",
    discriminator: Some(odata_type::HOST),
    base: Some(&ARTIFACT),
    fields: &[
        FieldDef::scalar("firstSeenDateTime", ScalarKind::DateTime),
        FieldDef::objects("hostPairs", create_host_pair),
        FieldDef::scalar("lastSeenDateTime", ScalarKind::DateTime),
        FieldDef::object("reputation", create_host_reputation),
        FieldDef::scalars("subdomains", ScalarKind::String),
    ],
};

pub static HOSTNAME: Schema = Schema {
    name: "microsoft.graph.security.hostname",
    discriminator: Some(odata_type::HOSTNAME),
    base: Some(&HOST),
    fields: &[FieldDef::string("registrant"), FieldDef::string("registrar")],
};

pub static IP_ADDRESS: Schema = Schema {
    name: "microsoft.graph.security.ipAddress",
    discriminator: Some(odata_type::IP_ADDRESS),
    base: Some(&HOST),
    fields: &[
        FieldDef::string("countryOrRegion"),
        FieldDef::string("hostingProvider"),
        FieldDef::string("netblock"),
    ],
};

pub static HOST_PAIR: Schema = Schema {
    name: "microsoft.graph.security.hostPair",
    discriminator: Some(odata_type::HOST_PAIR),
    base: Some(&ENTITY),
    fields: &[
        FieldDef::object("childHost", create_host),
        FieldDef::scalar("firstSeenDateTime", ScalarKind::DateTime),
        FieldDef::scalar("lastSeenDateTime", ScalarKind::DateTime),
        FieldDef::string("linkKind"),
        FieldDef::object("parentHost", create_host),
    ],
};

pub static HOST_REPUTATION: Schema = Schema {
    name: "microsoft.graph.security.hostReputation",
    discriminator: Some(odata_type::HOST_REPUTATION),
    base: Some(&ENTITY),
    fields: &[
        FieldDef::enumeration("classification", &HOST_REPUTATION_CLASSIFICATION),
        FieldDef::scalar("score", ScalarKind::Int32),
    ],
};

pub static ARTIFACT_REGISTRY: LazyLock<DiscriminatorRegistry> = LazyLock::new(|| {
    DiscriminatorRegistry::new(new_artifact as fn() -> Record)
        .with(odata_type::HOST, new_host)
        .with(odata_type::HOSTNAME, new_hostname)
        .with(odata_type::IP_ADDRESS, new_ip_address)
});

pub static HOST_REGISTRY: LazyLock<DiscriminatorRegistry> = LazyLock::new(|| {
    DiscriminatorRegistry::new(new_host as fn() -> Record)
        .with(odata_type::HOSTNAME, new_hostname)
        .with(odata_type::IP_ADDRESS, new_ip_address)
});

pub fn new_artifact() -> Record {
    Record::new(&ARTIFACT)
}

pub fn new_host() -> Record {
    Record::new(&HOST)
}

pub fn new_hostname() -> Record {
    Record::new(&HOSTNAME)
}

pub fn new_ip_address() -> Record {
    Record::new(&IP_ADDRESS)
}

pub fn new_host_pair() -> Record {
    Record::new(&HOST_PAIR)
}

pub fn new_host_reputation() -> Record {
    Record::new(&HOST_REPUTATION)
}

pub fn create_artifact(node: &dyn ParseNode) -> DecodeResult<Record> {
    ARTIFACT_REGISTRY.create(node)
}

pub fn create_host(node: &dyn ParseNode) -> DecodeResult<Record> {
    HOST_REGISTRY.create(node)
}

pub fn create_host_pair(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_host_pair())
}

pub fn create_host_reputation(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(new_host_reputation())
}

record_model!(Artifact => ARTIFACT, registry = ARTIFACT_REGISTRY);
record_model!(Host => HOST, registry = HOST_REGISTRY);
record_model!(Hostname => HOSTNAME);
record_model!(IpAddress => IP_ADDRESS);
record_model!(HostPair => HOST_PAIR);
record_model!(HostReputation => HOST_REPUTATION);

impl EntityLike for Artifact {}
impl EntityLike for Host {}
impl EntityLike for Hostname {}
impl EntityLike for IpAddress {}
impl EntityLike for HostPair {}
impl EntityLike for HostReputation {}

/// Properties every host variant carries.
pub trait HostLike: EntityLike {
    fn first_seen_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.as_record().date_time("firstSeenDateTime")
    }

    fn set_first_seen_date_time(&mut self, value: DateTime<FixedOffset>) {
        self.as_record_mut().put("firstSeenDateTime", value);
    }

    fn last_seen_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.as_record().date_time("lastSeenDateTime")
    }

    fn set_last_seen_date_time(&mut self, value: DateTime<FixedOffset>) {
        self.as_record_mut().put("lastSeenDateTime", value);
    }

    fn host_pairs(&self) -> Option<Vec<HostPair>> {
        self.as_record().objects("hostPairs")
    }

    fn reputation(&self) -> Option<HostReputation> {
        self.as_record().object("reputation")
    }

    fn set_reputation(&mut self, reputation: HostReputation) {
        self.as_record_mut().put("reputation", reputation.into_record());
    }

    fn subdomains(&self) -> Option<Vec<&str>> {
        self.as_record().strings("subdomains")
    }
}

impl HostLike for Host {}
impl HostLike for Hostname {}
impl HostLike for IpAddress {}

impl Hostname {
    pub fn registrant(&self) -> Option<&str> {
        self.0.string("registrant")
    }

    pub fn registrar(&self) -> Option<&str> {
        self.0.string("registrar")
    }

    pub fn set_registrar(&mut self, registrar: &str) {
        self.0.put("registrar", registrar);
    }
}

impl IpAddress {
    pub fn country_or_region(&self) -> Option<&str> {
        self.0.string("countryOrRegion")
    }

    pub fn hosting_provider(&self) -> Option<&str> {
        self.0.string("hostingProvider")
    }

    pub fn netblock(&self) -> Option<&str> {
        self.0.string("netblock")
    }
}

impl HostPair {
    pub fn child_host(&self) -> Option<AnyHost> {
        self.0.record("childHost").cloned().map(AnyHost::from)
    }

    pub fn parent_host(&self) -> Option<AnyHost> {
        self.0.record("parentHost").cloned().map(AnyHost::from)
    }

    pub fn link_kind(&self) -> Option<&str> {
        self.0.string("linkKind")
    }
}

impl HostReputation {
    pub fn classification(&self) -> Option<HostReputationClassification> {
        self.0.enumeration("classification")
    }

    pub fn set_classification(&mut self, classification: HostReputationClassification) {
        self.0.put("classification", classification.to_enum_value());
    }

    pub fn score(&self) -> Option<i32> {
        self.0.i32("score")
    }

    pub fn set_score(&mut self, score: i32) {
        self.0.put("score", score);
    }
}

/// A host of whichever concrete variant its schema names.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyHost {
    Host(Host),
    Hostname(Hostname),
    IpAddress(IpAddress),
}

impl From<Record> for AnyHost {
    /// # Panics
    ///
    /// Panics when the record is not a host.
    fn from(record: Record) -> Self {
        <AnyHost as Model>::from_record(record)
    }
}

impl Model for AnyHost {
    fn schema() -> &'static Schema {
        &HOST
    }

    fn wrap(record: Record) -> Self {
        match record.schema().name {
            name if name == HOSTNAME.name => AnyHost::Hostname(Hostname::wrap(record)),
            name if name == IP_ADDRESS.name => AnyHost::IpAddress(IpAddress::wrap(record)),
            _ => AnyHost::Host(Host::wrap(record)),
        }
    }

    fn as_record(&self) -> &Record {
        match self {
            AnyHost::Host(host) => host.as_record(),
            AnyHost::Hostname(host) => host.as_record(),
            AnyHost::IpAddress(host) => host.as_record(),
        }
    }

    fn as_record_mut(&mut self) -> &mut Record {
        match self {
            AnyHost::Host(host) => host.as_record_mut(),
            AnyHost::Hostname(host) => host.as_record_mut(),
            AnyHost::IpAddress(host) => host.as_record_mut(),
        }
    }

    fn into_record(self) -> Record {
        match self {
            AnyHost::Host(host) => host.into_record(),
            AnyHost::Hostname(host) => host.into_record(),
            AnyHost::IpAddress(host) => host.into_record(),
        }
    }

    fn create_from_discriminator(node: &dyn ParseNode) -> DecodeResult<Record> {
        HOST_REGISTRY.create(node)
    }
}

impl EntityLike for AnyHost {}
impl HostLike for AnyHost {}

/// An artifact of whichever concrete variant its schema names.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyArtifact {
    Artifact(Artifact),
    Host(AnyHost),
}

impl AnyArtifact {
    pub fn as_host(&self) -> Option<&AnyHost> {
        match self {
            AnyArtifact::Host(host) => Some(host),
            AnyArtifact::Artifact(_) => None,
        }
    }
}

impl Model for AnyArtifact {
    fn schema() -> &'static Schema {
        &ARTIFACT
    }

    fn wrap(record: Record) -> Self {
        if record.schema().is_a(&HOST) {
            AnyArtifact::Host(AnyHost::wrap(record))
        } else {
            AnyArtifact::Artifact(Artifact::wrap(record))
        }
    }

    fn as_record(&self) -> &Record {
        match self {
            AnyArtifact::Artifact(artifact) => artifact.as_record(),
            AnyArtifact::Host(host) => host.as_record(),
        }
    }

    fn as_record_mut(&mut self) -> &mut Record {
        match self {
            AnyArtifact::Artifact(artifact) => artifact.as_record_mut(),
            AnyArtifact::Host(host) => host.as_record_mut(),
        }
    }

    fn into_record(self) -> Record {
        match self {
            AnyArtifact::Artifact(artifact) => artifact.into_record(),
            AnyArtifact::Host(host) => host.into_record(),
        }
    }

    fn create_from_discriminator(node: &dyn ParseNode) -> DecodeResult<Record> {
        ARTIFACT_REGISTRY.create(node)
    }
}

impl EntityLike for AnyArtifact {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_constructors_stamp_their_discriminator() {
        assert_eq!(Hostname::default().odata_type(), Some(odata_type::HOSTNAME));
        assert_eq!(IpAddress::default().odata_type(), Some(odata_type::IP_ADDRESS));
    }

    #[test]
    fn hostname_inherits_host_and_entity_fields() {
        let names: Vec<_> = HOSTNAME.all_fields().iter().map(|field| field.name).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "@odata.type",
                "firstSeenDateTime",
                "hostPairs",
                "lastSeenDateTime",
                "reputation",
                "subdomains",
                "registrant",
                "registrar",
            ]
        );
    }

    #[test]
    fn host_leaves_relationship_properties_undeclared() {
        for name in [
            "childHostPairs",
            "parentHostPairs",
            "components",
            "cookies",
            "passiveDns",
            "sslCertificates",
            "trackers",
            "whois",
        ] {
            assert!(!HOST.declares(name), "{name} should be undeclared");
        }
    }

    #[test]
    fn any_host_selects_variant_by_schema() {
        assert!(matches!(AnyHost::from(new_hostname()), AnyHost::Hostname(_)));
        assert!(matches!(AnyHost::from(new_ip_address()), AnyHost::IpAddress(_)));
        assert!(matches!(AnyHost::from(new_host()), AnyHost::Host(_)));
    }

    #[test]
    fn any_artifact_nests_hosts() {
        let artifact = AnyArtifact::wrap(new_ip_address());
        assert!(matches!(artifact.as_host(), Some(AnyHost::IpAddress(_))));
        assert!(AnyArtifact::wrap(new_artifact()).as_host().is_none());
    }

    #[test]
    #[should_panic(expected = "cannot be viewed as microsoft.graph.security.host")]
    fn any_host_rejects_unrelated_records() {
        let _ = AnyHost::from(new_host_pair());
    }

    #[test]
    fn reputation_setters_store_typed_values() {
        let mut reputation = HostReputation::default();
        reputation.set_classification(HostReputationClassification::Suspicious);
        reputation.set_score(42);

        assert_eq!(
            reputation.classification(),
            Some(HostReputationClassification::Suspicious)
        );
        assert_eq!(reputation.score(), Some(42));

        let mut host = Host::default();
        host.set_reputation(reputation);
        assert_eq!(host.reputation().and_then(|r| r.score()), Some(42));
    }
}

//! Record schemas, enum codecs and discriminator registries for a representative slice of the
//! Microsoft Graph model.
//!
//! # Design constraints
//! - Schemas list only their own fields; inherited fields come from `base`.
//! - Registries are built once, lazily, and never mutated afterwards.
//! - Wire names and discriminator strings must match the service exactly.

#[macro_use]
mod macros;

pub mod callrecords;
pub mod entity;
pub mod family;
pub mod security;

pub use family::{Family, enum_codec, enum_codecs, families, family};

/// Discriminator strings.
pub mod odata_type {
    pub const ARTIFACT: &str = "#microsoft.graph.security.artifact";
    pub const HOST: &str = "#microsoft.graph.security.host";
    pub const HOSTNAME: &str = "#microsoft.graph.security.hostname";
    pub const IP_ADDRESS: &str = "#microsoft.graph.security.ipAddress";
    pub const HOST_PAIR: &str = "#microsoft.graph.security.hostPair";
    pub const HOST_REPUTATION: &str = "#microsoft.graph.security.hostReputation";
    pub const CALL_RECORD: &str = "#microsoft.graph.callRecords.callRecord";
    pub const MEDIA: &str = "#microsoft.graph.callRecords.media";
    pub const MEDIA_STREAM: &str = "#microsoft.graph.callRecords.mediaStream";
    pub const DEVICE_INFO: &str = "#microsoft.graph.callRecords.deviceInfo";
}

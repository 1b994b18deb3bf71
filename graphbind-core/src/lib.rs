//! Extensible records with discriminator-based polymorphic decoding.
//!
//! A [`Record`] stores every property of a payload, declared or not, in its own backing store.
//! Its [`Schema`] names the declared properties and their kinds; anything else is kept as
//! additional data and written back out after the declared fields, so payloads from newer
//! servers survive a round trip.
//!
//! Polymorphic base types resolve their concrete variant through a [`DiscriminatorRegistry`]
//! keyed by `@odata.type`. Enum properties go through an [`EnumCodec`], which can map values
//! this build does not recognize to a sentinel member.
//!
//! # Design constraints
//! - Unknown discriminators and unknown enum members are not errors.
//! - Typed accessors panic on a stored value of the wrong kind; encoding reports it as
//!   [`EncodeError::SchemaMismatch`] instead.
//! - Wire formats live behind [`ParseNode`] and [`SerializationWriter`].

mod enums;
mod error;
mod fault;
mod model;
mod ports;
mod record;
mod registry;
mod schema;
mod value;

pub use enums::{EnumCodec, EnumValue, Multiplicity, WireEnum};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, RecordError};
pub use model::Model;
pub use ports::{DATE_FORMAT, ParseNode, Serializable, SerializationWriter, TIME_FORMAT};
pub use record::{AdditionalData, FieldDeserializer, Record, parse_object};
pub use registry::{DISCRIMINATOR_PROPERTY, DiscriminatorRegistry};
pub use schema::{FieldDef, FieldKind, RecordFactory, ScalarKind, Schema};
pub use value::{PropertyMap, Value};

pub use graphbind_store as store;

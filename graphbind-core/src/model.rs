//! Typed views over records.

use crate::error::{DecodeResult, EncodeResult};
use crate::fault;
use crate::ports::{ParseNode, Serializable, SerializationWriter};
use crate::record::{AdditionalData, Record, parse_object};
use crate::schema::Schema;
use crate::value::PropertyMap;

/// A typed wrapper around a [`Record`] of one schema (or a schema derived from it).
///
/// Implementors supply the schema and the wrapping; accessors for declared properties are
/// written on top of [`Model::as_record`]. Polymorphic base types override
/// [`Model::create_from_discriminator`] to dispatch through their registry.
pub trait Model: Sized {
    fn schema() -> &'static Schema;

    /// Wrap without checking the schema.
    fn wrap(record: Record) -> Self;

    fn as_record(&self) -> &Record;

    fn as_record_mut(&mut self) -> &mut Record;

    fn into_record(self) -> Record;

    /// Empty record of the variant named by the payload's discriminator.
    fn create_from_discriminator(_node: &dyn ParseNode) -> DecodeResult<Record> {
        Ok(Record::new(Self::schema()))
    }

    /// Fresh instance with the schema's default discriminator applied.
    fn new_default() -> Self {
        Self::wrap(Record::new(Self::schema()))
    }

    /// # Panics
    ///
    /// Panics when the record's schema is neither `Self::schema()` nor derived from it.
    fn from_record(record: Record) -> Self {
        if !record.schema().is_a(Self::schema()) {
            fault::wrong_model(Self::schema(), record.schema());
        }
        Self::wrap(record)
    }

    fn try_from_record(record: Record) -> Result<Self, Record> {
        if record.schema().is_a(Self::schema()) {
            Ok(Self::wrap(record))
        } else {
            Err(record)
        }
    }

    /// Decode an object node. `None` for an explicit null.
    fn decode(node: &dyn ParseNode) -> DecodeResult<Option<Self>> {
        Ok(parse_object(node, Self::create_from_discriminator)?.map(Self::from_record))
    }

    fn odata_type(&self) -> Option<&str> {
        self.as_record().odata_type()
    }

    fn additional_data(&self) -> PropertyMap {
        self.as_record().additional_data()
    }

    fn additional_data_mut(&mut self) -> AdditionalData<'_> {
        self.as_record_mut().additional_data_mut()
    }
}

impl<M: Model> Serializable for M {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> EncodeResult<()> {
        self.as_record().serialize(writer)
    }
}

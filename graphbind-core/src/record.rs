//! Extensible records: declared and undeclared properties in one backing store.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use graphbind_store::{BackingStore, BackingStoreFactory, InMemoryBackingStoreFactory, StoreResult};
use indexmap::IndexMap;
use tracing::trace;
use uuid::Uuid;

use crate::enums::{EnumValue, WireEnum};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult, RecordError};
use crate::fault;
use crate::model::Model;
use crate::ports::{ParseNode, Serializable, SerializationWriter};
use crate::registry::DISCRIMINATOR_PROPERTY;
use crate::schema::{FieldDef, FieldKind, RecordFactory, ScalarKind, Schema};
use crate::value::{PropertyMap, Value};

/// Decodes one declared property from a parse node into a record.
pub type FieldDeserializer =
    Box<dyn Fn(&mut Record, &dyn ParseNode) -> DecodeResult<()> + Send + Sync>;

/// A record of some [`Schema`], backed by its own store.
///
/// Declared and undeclared properties are stored side by side; the schema decides which names
/// are declared. Undeclared properties survive a decode/encode round trip unchanged.
pub struct Record {
    schema: &'static Schema,
    store: Box<dyn BackingStore<Value>>,
}

impl Record {
    /// Empty record backed by an in-memory store. Schemas with a discriminator get it written
    /// into `@odata.type`.
    pub fn new(schema: &'static Schema) -> Self {
        Self::with_store_factory(schema, &InMemoryBackingStoreFactory)
    }

    pub fn with_store_factory(
        schema: &'static Schema,
        factory: &dyn BackingStoreFactory<Value>,
    ) -> Self {
        let mut record = Self {
            schema,
            store: factory.create(),
        };
        if let Some(discriminator) = schema.discriminator {
            record.put(DISCRIMINATOR_PROPERTY, discriminator);
        }
        record
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Value of `@odata.type`, if stored.
    pub fn odata_type(&self) -> Option<&str> {
        self.string(DISCRIMINATOR_PROPERTY)
    }

    /// Declared or undeclared property. A stored null is `Some(&Value::Null)`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }

    /// Overwrite or insert without type checking.
    ///
    /// Nested records assigned after initialization are marked changed throughout, so a
    /// change-only serialization writes them whole.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> StoreResult<()> {
        self.assign(name, value.into())
    }

    /// Store a property whose name is known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if the backing store rejects the name.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) {
        if let Err(err) = self.assign(name, value.into()) {
            fault::rejected_key(name, err);
        }
    }

    fn assign(&mut self, name: &str, mut value: Value) -> StoreResult<()> {
        if self.store.initialization_completed() {
            value.mark_all_changed();
        }
        self.store.set(name, value)
    }

    /// Once initialization has completed, a removed property is written as null by a
    /// change-only serialization and listed by [`Record::keys_changed_to_null`].
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.store.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Every stored property the schema does not declare, in insertion order.
    pub fn additional_data(&self) -> PropertyMap {
        self.store
            .entries()
            .into_iter()
            .filter(|(name, _)| !self.schema.declares(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    pub fn additional_data_mut(&mut self) -> AdditionalData<'_> {
        AdditionalData { record: self }
    }

    /// Deserializer table keyed by wire name: the base schema's table extended with this
    /// schema's own fields.
    pub fn field_deserializers(&self) -> IndexMap<&'static str, FieldDeserializer> {
        deserializers_for(self.schema)
    }

    /// Assign every property of an object node. Declared properties go through the field
    /// deserializers, the rest are stored untyped.
    ///
    /// Runs with initialization in progress, so a freshly populated record reports no changes.
    pub fn populate(&mut self, node: &dyn ParseNode) -> DecodeResult<()> {
        let deserializers = self.field_deserializers();
        self.store.set_initialization_completed(false);
        let result = self.assign_fields(node, &deserializers);
        self.store.set_initialization_completed(true);
        result
    }

    fn assign_fields(
        &mut self,
        node: &dyn ParseNode,
        deserializers: &IndexMap<&'static str, FieldDeserializer>,
    ) -> DecodeResult<()> {
        for (name, child) in node.property_nodes()? {
            match deserializers.get(name.as_str()) {
                Some(deserialize) => deserialize(&mut *self, &*child).map_err(|e| e.in_field(&name))?,
                None => {
                    trace!(schema = self.schema.name, property = %name, "storing undeclared property");
                    let value = child.untyped_value().map_err(|e| e.in_field(&name))?;
                    self.store_decoded(&name, value)?;
                }
            }
        }
        Ok(())
    }

    fn decode_field(&mut self, field: &'static FieldDef, node: &dyn ParseNode) -> DecodeResult<()> {
        match decode_kind(field.kind, node)? {
            Some(value) => self.store_decoded(field.name, value),
            None => Ok(()),
        }
    }

    /// Names are stored exactly as they appear in the payload.
    fn store_decoded(&mut self, name: &str, value: Value) -> DecodeResult<()> {
        self.assign(name, value)
            .map_err(|err| DecodeError::InvalidFormat {
                kind: "property name",
                value: name.to_string(),
                message: err.to_string(),
            })
    }

    /// Write declared fields (base first, each schema in declaration order) followed by the
    /// additional data.
    ///
    /// Absent properties are skipped and stored nulls are written as nulls. With
    /// [`Record::set_return_only_changed_values`] on, only changed properties and nested
    /// records containing changes are written, and properties removed since initialization
    /// are written as nulls.
    pub fn serialize(&self, writer: &mut dyn SerializationWriter) -> EncodeResult<()> {
        let only_changed = self.store.return_only_changed_values();
        let removed = if only_changed {
            self.store.removed_keys()
        } else {
            Vec::new()
        };
        let null = Value::Null;

        for field in self.schema.all_fields() {
            let Some(value) = self.store.peek(field.name) else {
                if removed.contains(&field.name) {
                    writer.write_value(Some(field.name), &null)?;
                }
                continue;
            };
            if !self.should_write(field.name, value) {
                continue;
            }
            check_kind(field, value)?;
            writer.write_value(Some(field.name), value)?;
        }

        let mut additional: Vec<(&str, &Value)> = self
            .store
            .raw_entries()
            .into_iter()
            .filter(|(name, value)| !self.schema.declares(name) && self.should_write(name, value))
            .collect();
        additional.extend(
            removed
                .iter()
                .filter(|name| !self.schema.declares(name))
                .map(|name| (*name, &null)),
        );
        writer.write_additional_data(&additional)
    }

    fn should_write(&self, name: &str, value: &Value) -> bool {
        !self.store.return_only_changed_values()
            || self.store.is_changed(name)
            || value.has_changes()
    }

    pub fn backing_store(&self) -> &dyn BackingStore<Value> {
        &*self.store
    }

    pub fn backing_store_mut(&mut self) -> &mut dyn BackingStore<Value> {
        &mut *self.store
    }

    /// Whether any property, or any nested record, changed since initialization completed.
    /// Removals count.
    pub fn has_changes(&self) -> bool {
        !self.store.removed_keys().is_empty()
            || self
                .store
                .raw_entries()
                .into_iter()
                .any(|(name, value)| self.store.is_changed(name) || value.has_changes())
    }

    /// Flag every property as changed, nested records included.
    pub fn mark_all_changed(&mut self) {
        self.store.mark_all_changed();
        let nested: Vec<String> = self
            .store
            .raw_entries()
            .into_iter()
            .filter(|(_, value)| matches!(value, Value::Record(_) | Value::List(_)))
            .map(|(name, _)| name.to_string())
            .collect();
        for name in nested {
            if let Some(value) = self.store.peek_mut(&name) {
                value.mark_all_changed();
            }
        }
    }

    pub fn keys_changed_to_null(&self) -> Vec<&str> {
        self.store.keys_changed_to_null()
    }

    /// Toggle change-only reads on this record and every nested record.
    pub fn set_return_only_changed_values(&mut self, only_changed: bool) {
        self.store.set_return_only_changed_values(only_changed);
        let nested: Vec<String> = self
            .store
            .raw_entries()
            .into_iter()
            .filter(|(_, value)| matches!(value, Value::Record(_) | Value::List(_)))
            .map(|(name, _)| name.to_string())
            .collect();
        for name in nested {
            if let Some(value) = self.store.peek_mut(&name) {
                propagate_only_changed(value, only_changed);
            }
        }
    }

    // Typed accessors. Absent and null both read as `None`.

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.get(name)?;
        if value.is_null() {
            return None;
        }
        match extract(value) {
            Some(typed) => Some(typed),
            None => fault::schema_mismatch(self.schema, name, expected, value),
        }
    }

    fn typed_list<'a, T>(
        &'a self,
        name: &str,
        expected: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = self.typed(name, "list", Value::as_list)?;
        let mut out = Vec::with_capacity(items.len());
        for item in items.iter().filter(|item| !item.is_null()) {
            match extract(item) {
                Some(typed) => out.push(typed),
                None => fault::schema_mismatch(self.schema, name, expected, item),
            }
        }
        Some(out)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.typed(name, "string", Value::as_str)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a bool.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.typed(name, "bool", Value::as_bool)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not an integer within `i32`.
    pub fn i32(&self, name: &str) -> Option<i32> {
        self.typed(name, "int32", |value| {
            value.as_i64().and_then(|n| i32::try_from(n).ok())
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not an integer.
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.typed(name, "int64", Value::as_i64)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not numeric.
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.typed(name, "float", Value::as_f64)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a date-time.
    pub fn date_time(&self, name: &str) -> Option<DateTime<FixedOffset>> {
        self.typed(name, "date-time", |value| match value {
            Value::DateTime(v) => Some(*v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a date.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.typed(name, "date", |value| match value {
            Value::Date(v) => Some(*v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a time of day.
    pub fn time_of_day(&self, name: &str) -> Option<NaiveTime> {
        self.typed(name, "time-of-day", |value| match value {
            Value::TimeOfDay(v) => Some(*v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a UUID.
    pub fn uuid(&self, name: &str) -> Option<Uuid> {
        self.typed(name, "uuid", |value| match value {
            Value::Uuid(v) => Some(*v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not an enum.
    pub fn enum_value(&self, name: &str) -> Option<EnumValue> {
        self.typed(name, "enum", |value| match value {
            Value::Enum(v) => Some(*v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a member of `E`'s codec.
    pub fn enumeration<E: WireEnum>(&self, name: &str) -> Option<E> {
        self.typed(name, E::codec().name(), |value| match value {
            Value::Enum(v) => E::from_enum_value(v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a list of `E` members.
    pub fn enumerations<E: WireEnum>(&self, name: &str) -> Option<Vec<E>> {
        self.typed_list(name, E::codec().name(), |value| match value {
            Value::Enum(v) => E::from_enum_value(v),
            _ => None,
        })
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a list of strings.
    pub fn strings(&self, name: &str) -> Option<Vec<&str>> {
        self.typed_list(name, "string", Value::as_str)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a list.
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.typed(name, "list", Value::as_list)
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a record.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.typed(name, "record", Value::as_record)
    }

    /// Mutable nested record. Marks the property as changed.
    ///
    /// # Panics
    ///
    /// Panics when the stored value is not a record.
    pub fn record_mut(&mut self, name: &str) -> Option<&mut Record> {
        let schema = self.schema;
        match self.store.get_mut(name)? {
            Value::Null => None,
            Value::Record(record) => Some(&mut **record),
            other => fault::schema_mismatch(schema, name, "record", other),
        }
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a list of records.
    pub fn records(&self, name: &str) -> Option<Vec<&Record>> {
        self.typed_list(name, "record", Value::as_record)
    }

    /// Nested record viewed as model `T` (cloned).
    ///
    /// # Panics
    ///
    /// Panics when the stored value is not a record of `T`'s schema or a derived one.
    pub fn object<T: Model>(&self, name: &str) -> Option<T> {
        self.record(name).map(|record| T::from_record(record.clone()))
    }

    /// # Panics
    ///
    /// Panics when the stored value is not a list of records of `T`'s schema.
    pub fn objects<T: Model>(&self, name: &str) -> Option<Vec<T>> {
        self.records(name).map(|records| {
            records
                .into_iter()
                .map(|record| T::from_record(record.clone()))
                .collect()
        })
    }
}

fn propagate_only_changed(value: &mut Value, only_changed: bool) {
    match value {
        Value::Record(record) => record.set_return_only_changed_values(only_changed),
        Value::List(items) => {
            for item in items {
                propagate_only_changed(item, only_changed);
            }
        }
        _ => {}
    }
}

fn deserializers_for(schema: &'static Schema) -> IndexMap<&'static str, FieldDeserializer> {
    let mut table = schema.base.map(deserializers_for).unwrap_or_default();
    for field in schema.fields {
        let deserialize: FieldDeserializer =
            Box::new(move |record: &mut Record, node: &dyn ParseNode| {
                record.decode_field(field, node)
            });
        table.insert(field.name, deserialize);
    }
    table
}

/// Build and populate a record from an object node. `None` for an explicit null.
pub fn parse_object(node: &dyn ParseNode, factory: RecordFactory) -> DecodeResult<Option<Record>> {
    if node.is_null() {
        return Ok(None);
    }
    let mut record = factory(node)?;
    record.populate(node)?;
    Ok(Some(record))
}

/// `None` means the property is left absent (an unrecognized enum without a sentinel).
fn decode_kind(kind: FieldKind, node: &dyn ParseNode) -> DecodeResult<Option<Value>> {
    if node.is_null() {
        return Ok(Some(Value::Null));
    }
    match kind {
        FieldKind::Scalar(scalar) => decode_scalar(scalar, node).map(Some),
        FieldKind::Enum(codec) => Ok(node.enum_value(codec)?.map(Value::Enum)),
        FieldKind::Object(factory) => Ok(parse_object(node, factory)?.map(Value::from)),
        FieldKind::ScalarCollection(scalar) => {
            decode_collection(node, |item| decode_scalar(scalar, item).map(Some))
        }
        FieldKind::EnumCollection(codec) => {
            decode_collection(node, |item| Ok(item.enum_value(codec)?.map(Value::Enum)))
        }
        FieldKind::ObjectCollection(factory) => decode_collection(node, |item| {
            Ok(parse_object(item, factory)?.map(Value::from))
        }),
        FieldKind::Untyped => node.untyped_value().map(Some),
    }
}

fn decode_collection(
    node: &dyn ParseNode,
    mut decode: impl FnMut(&dyn ParseNode) -> DecodeResult<Option<Value>>,
) -> DecodeResult<Option<Value>> {
    let Some(items) = node.collection_nodes()? else {
        return Ok(Some(Value::Null));
    };
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.is_null() {
            out.push(Value::Null);
            continue;
        }
        if let Some(value) = decode(&**item).map_err(|e| e.in_field(index.to_string()))? {
            out.push(value);
        }
    }
    Ok(Some(Value::List(out)))
}

fn decode_scalar(kind: ScalarKind, node: &dyn ParseNode) -> DecodeResult<Value> {
    let value = match kind {
        ScalarKind::String => node.string_value()?.map(Value::String),
        ScalarKind::Bool => node.bool_value()?.map(Value::Bool),
        ScalarKind::Int32 => match node.i64_value()? {
            Some(n) if i32::try_from(n).is_err() => {
                return Err(DecodeError::OutOfRange {
                    kind: "int32",
                    value: n.to_string(),
                });
            }
            other => other.map(Value::Int),
        },
        ScalarKind::Int64 => node.i64_value()?.map(Value::Int),
        // Range-checked only; the value is kept at full precision.
        ScalarKind::Float32 => match node.f64_value()? {
            Some(n) if n.is_finite() && n.abs() > f64::from(f32::MAX) => {
                return Err(DecodeError::OutOfRange {
                    kind: "float32",
                    value: n.to_string(),
                });
            }
            other => other.map(Value::Float),
        },
        ScalarKind::Float64 => node.f64_value()?.map(Value::Float),
        ScalarKind::DateTime => node.date_time_value()?.map(Value::DateTime),
        ScalarKind::Date => node.date_value()?.map(Value::Date),
        ScalarKind::TimeOfDay => node.time_value()?.map(Value::TimeOfDay),
        ScalarKind::Uuid => node.uuid_value()?.map(Value::Uuid),
    };
    Ok(value.unwrap_or(Value::Null))
}

fn scalar_matches(kind: ScalarKind, value: &Value) -> bool {
    match (kind, value) {
        (ScalarKind::String, Value::String(_))
        | (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Int64, Value::Int(_))
        | (
            ScalarKind::Float32 | ScalarKind::Float64,
            Value::Float(_) | Value::Int(_) | Value::UInt(_),
        )
        | (ScalarKind::DateTime, Value::DateTime(_))
        | (ScalarKind::Date, Value::Date(_))
        | (ScalarKind::TimeOfDay, Value::TimeOfDay(_))
        | (ScalarKind::Uuid, Value::Uuid(_)) => true,
        (ScalarKind::Int32, Value::Int(n)) => i32::try_from(*n).is_ok(),
        _ => false,
    }
}

fn enum_matches(codec_name: &str, value: &Value) -> bool {
    matches!(value, Value::Enum(v) if v.codec().name() == codec_name)
}

fn check_kind(field: &FieldDef, value: &Value) -> EncodeResult<()> {
    if value.is_null() {
        return Ok(());
    }
    let matches = match (&field.kind, value) {
        (FieldKind::Scalar(kind), value) => scalar_matches(*kind, value),
        (FieldKind::Enum(codec), value) => enum_matches(codec.name(), value),
        (FieldKind::Object(_), Value::Record(_)) => true,
        (FieldKind::ScalarCollection(kind), Value::List(items)) => items
            .iter()
            .all(|item| item.is_null() || scalar_matches(*kind, item)),
        (FieldKind::EnumCollection(codec), Value::List(items)) => items
            .iter()
            .all(|item| item.is_null() || enum_matches(codec.name(), item)),
        (FieldKind::ObjectCollection(_), Value::List(items)) => items
            .iter()
            .all(|item| matches!(item, Value::Null | Value::Record(_))),
        (FieldKind::Untyped, _) => true,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(EncodeError::SchemaMismatch {
            field: field.name.to_string(),
            expected: field.kind.label(),
            found: value.kind(),
        })
    }
}

impl Serializable for Record {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> EncodeResult<()> {
        Record::serialize(self, writer)
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema,
            store: self.store.clone_box(),
        }
    }
}

/// Same schema and the same property set with equal values; order is ignored.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if self.schema.name != other.schema.name {
            return false;
        }
        let mine = self.store.raw_entries();
        mine.len() == other.store.raw_entries().len()
            && mine
                .iter()
                .all(|(name, value)| other.store.peek(name) == Some(*value))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("schema", &self.schema.name)
            .field(
                "properties",
                &self.store.raw_entries().into_iter().collect::<IndexMap<_, _>>(),
            )
            .finish()
    }
}

/// Mutable view over a record's undeclared properties.
pub struct AdditionalData<'a> {
    record: &'a mut Record,
}

impl AdditionalData<'_> {
    /// Insert or overwrite an undeclared property.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.ensure_undeclared(name)?;
        self.record.assign(name, value.into())?;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, RecordError> {
        self.ensure_undeclared(name)?;
        Ok(self.record.store.remove(name))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        if self.record.schema.declares(name) {
            return None;
        }
        self.record.store.get(name)
    }

    pub fn len(&self) -> usize {
        self.record.additional_data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_map(&self) -> PropertyMap {
        self.record.additional_data()
    }

    fn ensure_undeclared(&self, name: &str) -> Result<(), RecordError> {
        if self.record.schema.declares(name) {
            return Err(RecordError::DeclaredProperty {
                name: name.to_string(),
                schema: self.record.schema.name,
            });
        }
        Ok(())
    }
}

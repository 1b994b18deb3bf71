//! Reader and writer ports implemented by wire-format bindings.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use uuid::Uuid;

use crate::enums::{EnumCodec, EnumValue};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::value::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// A node in a parsed payload tree.
///
/// Scalar reads return `Ok(None)` for an explicit null and `WrongType` for any other mismatch.
pub trait ParseNode {
    fn child_node(&self, name: &str) -> Option<Box<dyn ParseNode + '_>>;

    fn is_null(&self) -> bool;

    fn string_value(&self) -> DecodeResult<Option<String>>;

    fn bool_value(&self) -> DecodeResult<Option<bool>>;

    fn i64_value(&self) -> DecodeResult<Option<i64>>;

    fn f64_value(&self) -> DecodeResult<Option<f64>>;

    /// Elements of an array node; `None` for null.
    fn collection_nodes(&self) -> DecodeResult<Option<Vec<Box<dyn ParseNode + '_>>>>;

    /// Members of an object node in payload order.
    fn property_nodes(&self) -> DecodeResult<Vec<(String, Box<dyn ParseNode + '_>)>>;

    /// The node as an untyped value tree, without interpreting strings.
    fn untyped_value(&self) -> DecodeResult<Value>;

    /// RFC 3339 date-time.
    fn date_time_value(&self) -> DecodeResult<Option<DateTime<FixedOffset>>> {
        let Some(raw) = self.string_value()? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(Some)
            .map_err(|e| invalid_format("date-time", raw, e))
    }

    fn date_value(&self) -> DecodeResult<Option<NaiveDate>> {
        let Some(raw) = self.string_value()? else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(Some)
            .map_err(|e| invalid_format("date", raw, e))
    }

    fn time_value(&self) -> DecodeResult<Option<NaiveTime>> {
        let Some(raw) = self.string_value()? else {
            return Ok(None);
        };
        NaiveTime::parse_from_str(&raw, TIME_FORMAT)
            .map(Some)
            .map_err(|e| invalid_format("time-of-day", raw, e))
    }

    fn uuid_value(&self) -> DecodeResult<Option<Uuid>> {
        let Some(raw) = self.string_value()? else {
            return Ok(None);
        };
        Uuid::parse_str(&raw)
            .map(Some)
            .map_err(|e| invalid_format("uuid", raw, e))
    }

    /// Decode through `codec`. Unrecognized members follow the codec's sentinel policy.
    fn enum_value(&self, codec: &'static EnumCodec) -> DecodeResult<Option<EnumValue>> {
        Ok(self.string_value()?.and_then(|raw| codec.decode(&raw)))
    }
}

fn invalid_format(kind: &'static str, value: String, err: impl std::fmt::Display) -> DecodeError {
    DecodeError::InvalidFormat {
        kind,
        value,
        message: err.to_string(),
    }
}

/// Something that can write itself through a [`SerializationWriter`].
pub trait Serializable {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> EncodeResult<()>;
}

/// Sink for serialized values.
///
/// `key` names the property inside an object and is `None` for array elements and the root.
/// Scalar writes given `None` as the value write nothing.
pub trait SerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> EncodeResult<()>;

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> EncodeResult<()>;

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> EncodeResult<()>;

    fn write_u64_value(&mut self, key: Option<&str>, value: Option<u64>) -> EncodeResult<()>;

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> EncodeResult<()>;

    fn write_null_value(&mut self, key: Option<&str>) -> EncodeResult<()>;

    fn start_object(&mut self, key: Option<&str>) -> EncodeResult<()>;

    fn end_object(&mut self) -> EncodeResult<()>;

    fn start_array(&mut self, key: Option<&str>) -> EncodeResult<()>;

    fn end_array(&mut self) -> EncodeResult<()>;

    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: &dyn Serializable,
    ) -> EncodeResult<()>;

    fn write_date_time_value(
        &mut self,
        key: Option<&str>,
        value: Option<&DateTime<FixedOffset>>,
    ) -> EncodeResult<()> {
        let formatted = value.map(|v| v.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        self.write_string_value(key, formatted.as_deref())
    }

    fn write_date_value(&mut self, key: Option<&str>, value: Option<&NaiveDate>) -> EncodeResult<()> {
        let formatted = value.map(|v| v.format(DATE_FORMAT).to_string());
        self.write_string_value(key, formatted.as_deref())
    }

    fn write_time_value(&mut self, key: Option<&str>, value: Option<&NaiveTime>) -> EncodeResult<()> {
        let formatted = value.map(|v| v.format(TIME_FORMAT).to_string());
        self.write_string_value(key, formatted.as_deref())
    }

    fn write_uuid_value(&mut self, key: Option<&str>, value: Option<&Uuid>) -> EncodeResult<()> {
        let formatted = value.map(|v| v.hyphenated().to_string());
        self.write_string_value(key, formatted.as_deref())
    }

    fn write_enum_value(&mut self, key: Option<&str>, value: Option<&EnumValue>) -> EncodeResult<()> {
        let formatted = value.map(EnumValue::to_wire_string);
        self.write_string_value(key, formatted.as_deref())
    }

    /// Write any value, dispatching on its variant.
    fn write_value(&mut self, key: Option<&str>, value: &Value) -> EncodeResult<()> {
        match value {
            Value::Null => self.write_null_value(key),
            Value::Bool(b) => self.write_bool_value(key, Some(*b)),
            Value::Int(n) => self.write_i64_value(key, Some(*n)),
            Value::UInt(n) => self.write_u64_value(key, Some(*n)),
            Value::Float(n) => self.write_f64_value(key, Some(*n)),
            Value::String(s) => self.write_string_value(key, Some(s.as_str())),
            Value::DateTime(v) => self.write_date_time_value(key, Some(v)),
            Value::Date(v) => self.write_date_value(key, Some(v)),
            Value::TimeOfDay(v) => self.write_time_value(key, Some(v)),
            Value::Uuid(v) => self.write_uuid_value(key, Some(v)),
            Value::Enum(v) => self.write_enum_value(key, Some(v)),
            Value::Record(record) => self.write_object_value(key, &**record),
            Value::List(items) => {
                self.start_array(key)?;
                for item in items {
                    self.write_value(None, item)?;
                }
                self.end_array()
            }
            Value::Map(map) => {
                self.start_object(key)?;
                for (name, item) in map {
                    self.write_value(Some(name.as_str()), item)?;
                }
                self.end_object()
            }
        }
    }

    /// Flush undeclared properties, in order, after all declared ones.
    fn write_additional_data(&mut self, entries: &[(&str, &Value)]) -> EncodeResult<()> {
        for &(name, value) in entries {
            self.write_value(Some(name), value)?;
        }
        Ok(())
    }
}

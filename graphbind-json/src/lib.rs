//! JSON binding for graphbind records.
//!
//! [`JsonParseNode`] and [`JsonSerializationWriter`] implement the core reader and writer ports
//! over `serde_json`. The free functions cover the usual whole-payload conversions, and
//! [`load_payloads`] scans a directory of payload fixtures without stopping at the first bad
//! file.

mod load;
mod node;
mod writer;

use graphbind_core::{
    DecodeError, DecodeResult, EncodeResult, Model, Record, RecordFactory, Serializable,
    SerializationWriter, parse_object,
};
use serde_json::Value as JsonValue;

pub use load::{LoadedPayload, PayloadLoadError, load_payloads};
pub use node::JsonParseNode;
pub use writer::JsonSerializationWriter;

/// Parse JSON text into a `serde_json` tree.
pub fn parse(payload: &str) -> DecodeResult<JsonValue> {
    serde_json::from_str(payload).map_err(|e| DecodeError::Syntax {
        message: e.to_string(),
    })
}

/// Decode a record from a parsed tree, building the root through `factory`.
///
/// A `null` root is rejected; an object is required.
pub fn record_from_value(value: &JsonValue, factory: RecordFactory) -> DecodeResult<Record> {
    let node = JsonParseNode::new(value);
    parse_object(&node, factory)?.ok_or(DecodeError::WrongType {
        expected: "object",
        found: "null",
    })
}

pub fn record_from_str(payload: &str, factory: RecordFactory) -> DecodeResult<Record> {
    record_from_value(&parse(payload)?, factory)
}

pub fn from_value<M: Model>(value: &JsonValue) -> DecodeResult<M> {
    let node = JsonParseNode::new(value);
    M::decode(&node)?.ok_or(DecodeError::WrongType {
        expected: "object",
        found: "null",
    })
}

pub fn from_str<M: Model>(payload: &str) -> DecodeResult<M> {
    from_value(&parse(payload)?)
}

pub fn from_slice<M: Model>(payload: &[u8]) -> DecodeResult<M> {
    let value = serde_json::from_slice(payload).map_err(|e| DecodeError::Syntax {
        message: e.to_string(),
    })?;
    from_value(&value)
}

pub fn to_value(value: &dyn Serializable) -> EncodeResult<JsonValue> {
    let mut writer = JsonSerializationWriter::new();
    writer.start_object(None)?;
    value.serialize(&mut writer)?;
    writer.end_object()?;
    writer.into_value()
}

pub fn to_string(value: &dyn Serializable) -> EncodeResult<String> {
    Ok(to_value(value)?.to_string())
}

pub fn to_string_pretty(value: &dyn Serializable) -> EncodeResult<String> {
    Ok(format!("{:#}", to_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbind_core::{FieldDef, ParseNode, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    static PLAIN: Schema = Schema {
        name: "plain",
        discriminator: None,
        base: None,
        fields: &[FieldDef::string("name")],
    };

    fn create_plain(_node: &dyn ParseNode) -> DecodeResult<Record> {
        Ok(Record::new(&PLAIN))
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        let err = record_from_str("{\"name\":", create_plain).unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { .. }));
    }

    #[test]
    fn null_root_is_rejected() {
        let err = record_from_str("null", create_plain).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongType {
                expected: "object",
                found: "null"
            }
        );
    }

    #[test]
    fn record_round_trips_through_text() {
        let record =
            record_from_str(r#"{"name":"a","extra":[1,{"x":true}]}"#, create_plain).unwrap();
        assert_eq!(
            to_value(&record).unwrap(),
            json!({ "name": "a", "extra": [1, { "x": true }] })
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let record = record_from_str(r#"{"name":"a"}"#, create_plain).unwrap();
        assert_eq!(to_string_pretty(&record).unwrap(), "{\n  \"name\": \"a\"\n}");
    }
}
